use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::errors::{AppError, AppResult};
use crate::models::domain::{
    AttemptOutcome, ContentItem, ProviderAttempt, ProviderResult, SourceTier,
};
use crate::providers::{Capability, Provider, ProviderChains, TopicRequest};

/// Tries the providers of a capability in priority order until one yields at
/// least one item. Each non-terminal attempt is bounded by `attempt_timeout`.
pub struct FallbackChainResolver {
    chains: ProviderChains,
    attempt_timeout: Duration,
}

fn tier_for(position: usize, terminal: bool) -> SourceTier {
    if terminal {
        SourceTier::LocalGenerated
    } else if position == 0 {
        SourceTier::PrimaryAi
    } else {
        SourceTier::FallbackAi
    }
}

impl FallbackChainResolver {
    /// Rejects chains that do not end in exactly one terminal provider or that
    /// mix capabilities.
    pub fn new(chains: ProviderChains, attempt_timeout: Duration) -> AppResult<Self> {
        for (capability, chain) in &chains {
            let terminal_positions: Vec<usize> = chain
                .iter()
                .enumerate()
                .filter(|(_, p)| p.is_terminal())
                .map(|(i, _)| i)
                .collect();

            if terminal_positions != vec![chain.len().saturating_sub(1)] || chain.is_empty() {
                return Err(AppError::ConfigurationError(format!(
                    "{} chain must end with exactly one terminal provider",
                    capability.as_str()
                )));
            }
            if let Some(stray) = chain.iter().find(|p| p.capability() != *capability) {
                return Err(AppError::ConfigurationError(format!(
                    "provider {} does not serve {}",
                    stray.id(),
                    capability.as_str()
                )));
            }
        }

        Ok(Self {
            chains,
            attempt_timeout,
        })
    }

    pub fn chain(&self, capability: Capability) -> AppResult<&[Arc<dyn Provider>]> {
        self.chains
            .get(&capability)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                AppError::ConfigurationError(format!(
                    "no provider chain configured for {}",
                    capability.as_str()
                ))
            })
    }

    pub async fn resolve(
        &self,
        request: &TopicRequest,
        capability: Capability,
    ) -> AppResult<ProviderResult> {
        let chain = self.chain(capability)?;
        let mut attempts = Vec::with_capacity(chain.len());

        for (position, provider) in chain.iter().enumerate() {
            let provider_id = provider.id();
            let terminal = provider.is_terminal();
            let started = Instant::now();

            let outcome = if terminal {
                Ok(provider.attempt(request).await)
            } else {
                tokio::time::timeout(self.attempt_timeout, provider.attempt(request)).await
            };
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let (attempt_outcome, detail) = match outcome {
                Ok(Ok(items)) if !items.is_empty() => {
                    log::info!(
                        "{} satisfied {} for '{}' with {} items in {}ms",
                        provider_id,
                        capability.as_str(),
                        request.topic,
                        items.len(),
                        elapsed_ms
                    );
                    attempts.push(ProviderAttempt {
                        provider: provider_id.clone(),
                        outcome: AttemptOutcome::Succeeded,
                        detail: None,
                        elapsed_ms,
                    });
                    return Ok(ProviderResult {
                        items,
                        provider_id,
                        tier: tier_for(position, terminal),
                        succeeded: true,
                        attempts,
                    });
                }
                Ok(Ok(_)) => (AttemptOutcome::Empty, None),
                Ok(Err(failure)) => (AttemptOutcome::Failed, Some(failure.to_string())),
                Err(_) => (
                    AttemptOutcome::TimedOut,
                    Some(format!("no reply within {:?}", self.attempt_timeout)),
                ),
            };

            log::warn!(
                "{} failed {} for '{}' ({:?}): {}",
                provider_id,
                capability.as_str(),
                request.topic,
                attempt_outcome,
                detail.as_deref().unwrap_or("no items")
            );
            attempts.push(ProviderAttempt {
                provider: provider_id,
                outcome: attempt_outcome,
                detail,
                elapsed_ms,
            });
        }

        Err(AppError::ConfigurationError(format!(
            "terminal provider for {} produced no items for '{}'",
            capability.as_str(),
            request.topic
        )))
    }

    /// Asks only the terminal provider of a chain. Used to top up a topic
    /// whose terminal output lost items to the request-wide uniqueness pass.
    pub async fn terminal_fill(
        &self,
        request: &TopicRequest,
        capability: Capability,
    ) -> AppResult<Vec<ContentItem>> {
        let terminal = self
            .chain(capability)?
            .last()
            .filter(|p| p.is_terminal())
            .ok_or_else(|| {
                AppError::ConfigurationError(format!(
                    "{} chain has no terminal provider",
                    capability.as_str()
                ))
            })?;

        terminal.attempt(request).await.map_err(|failure| {
            AppError::ConfigurationError(format!(
                "terminal provider {} failed for '{}': {}",
                terminal.id(),
                request.topic,
                failure
            ))
        })
    }
}
