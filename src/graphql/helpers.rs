use async_graphql::Context;
use validator::Validate;

use crate::{app_state::AppState, errors::AppResult};

pub fn app_state<'a>(ctx: &Context<'a>) -> AppResult<&'a AppState> {
    Ok(ctx.data::<AppState>()?)
}

/// Runs `validator` rules on a GraphQL input before it reaches a service.
pub fn validated<T: Validate>(input: T) -> AppResult<T> {
    input.validate()?;
    Ok(input)
}
