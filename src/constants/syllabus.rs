#[derive(Debug, Clone, Copy)]
pub struct SyllabusUnit {
    pub name: &'static str,
    pub topics: &'static [&'static str],
}

#[derive(Debug, Clone, Copy)]
pub struct SyllabusSubject {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub units: &'static [SyllabusUnit],
}

pub const SUBJECTS: &[SyllabusSubject] = &[
    SyllabusSubject {
        code: "315319-OPERATING SYSTEM",
        name: "Operating System",
        description: "Comprehensive study of operating system concepts, process management, memory management, and system architecture.",
        units: &[
            SyllabusUnit {
                name: "Unit 1",
                topics: &[
                    "Introduction to Operating Systems",
                    "OS Functions and Services",
                    "Types of Operating Systems",
                    "System Calls and Interrupts",
                    "Operating System Architecture",
                ],
            },
            SyllabusUnit {
                name: "Unit 2",
                topics: &[
                    "Process Management",
                    "Process States and Lifecycle",
                    "Process Scheduling Algorithms",
                    "Interprocess Communication",
                    "Thread Management",
                ],
            },
            SyllabusUnit {
                name: "Unit 3",
                topics: &[
                    "Memory Management",
                    "Virtual Memory Concepts",
                    "Page Replacement Algorithms",
                    "Memory Allocation Strategies",
                    "Memory Protection and Security",
                ],
            },
            SyllabusUnit {
                name: "Unit 4",
                topics: &[
                    "File Systems",
                    "File Organization Methods",
                    "Directory Structure and Management",
                    "File Operations and Access Control",
                    "File System Implementation",
                ],
            },
            SyllabusUnit {
                name: "Unit 5",
                topics: &[
                    "Device Management",
                    "I/O Systems and Controllers",
                    "Device Drivers and Interfaces",
                    "Disk Scheduling Algorithms",
                    "Storage Management",
                ],
            },
        ],
    },
    SyllabusSubject {
        code: "315323-SOFTWARE ENGINEERING",
        name: "Software Engineering",
        description: "Software development methodologies, system analysis, design patterns, and project management principles.",
        units: &[
            SyllabusUnit {
                name: "Unit 1",
                topics: &[
                    "Introduction to Software Engineering",
                    "Software Development Life Cycle",
                    "Software Process Models",
                    "Requirements Engineering",
                    "Software Project Management",
                ],
            },
            SyllabusUnit {
                name: "Unit 2",
                topics: &[
                    "System Analysis and Design",
                    "Object-Oriented Analysis",
                    "UML Diagrams and Modeling",
                    "Design Patterns",
                    "Software Architecture",
                ],
            },
            SyllabusUnit {
                name: "Unit 3",
                topics: &[
                    "Software Testing",
                    "Testing Strategies and Methods",
                    "Unit Testing and Integration Testing",
                    "System Testing and Validation",
                    "Test Case Design",
                ],
            },
            SyllabusUnit {
                name: "Unit 4",
                topics: &[
                    "Software Quality Assurance",
                    "Quality Metrics and Standards",
                    "Code Review and Inspection",
                    "Software Maintenance",
                    "Configuration Management",
                ],
            },
            SyllabusUnit {
                name: "Unit 5",
                topics: &[
                    "Project Scheduling and Tracking",
                    "Project Planning and Estimation",
                    "Risk Management",
                    "Team Management",
                    "Software Metrics and Measurement",
                ],
            },
        ],
    },
    SyllabusSubject {
        code: "315326-DATA ANALYTICS",
        name: "Data Analytics",
        description: "Data analysis techniques, statistical methods, data visualization, and business intelligence concepts.",
        units: &[
            SyllabusUnit {
                name: "Unit 1",
                topics: &[
                    "Introduction to Data Analytics",
                    "Types of Data and Data Sources",
                    "Data Collection Methods",
                    "Data Preprocessing",
                    "Exploratory Data Analysis",
                ],
            },
            SyllabusUnit {
                name: "Unit 2",
                topics: &[
                    "Statistical Analysis",
                    "Descriptive Statistics",
                    "Inferential Statistics",
                    "Hypothesis Testing",
                    "Correlation and Regression",
                ],
            },
            SyllabusUnit {
                name: "Unit 3",
                topics: &[
                    "Data Visualization",
                    "Visualization Principles",
                    "Charts and Graphs",
                    "Interactive Dashboards",
                    "Data Storytelling",
                ],
            },
            SyllabusUnit {
                name: "Unit 4",
                topics: &[
                    "Machine Learning Basics",
                    "Supervised Learning",
                    "Unsupervised Learning",
                    "Model Evaluation",
                    "Feature Engineering",
                ],
            },
            SyllabusUnit {
                name: "Unit 5",
                topics: &[
                    "Business Intelligence",
                    "Data Warehousing",
                    "OLAP and Data Cubes",
                    "Business Analytics",
                    "Predictive Analytics",
                ],
            },
        ],
    },
];

/// Looks a subject up by its code, ignoring case and surrounding whitespace.
pub fn find_subject(code: &str) -> Option<&'static SyllabusSubject> {
    let code = code.trim();
    SUBJECTS.iter().find(|s| s.code.eq_ignore_ascii_case(code))
}

/// Catalog topics of a unit, empty when the subject or unit is unknown.
pub fn unit_topics(subject_code: &str, unit: &str) -> &'static [&'static str] {
    let unit = unit.trim();
    find_subject(subject_code)
        .and_then(|s| s.units.iter().find(|u| u.name.eq_ignore_ascii_case(unit)))
        .map(|u| u.topics)
        .unwrap_or(&[])
}

/// Human readable subject name, falling back to the code itself.
pub fn subject_name(subject_code: &str) -> String {
    find_subject(subject_code)
        .map(|s| s.name.to_string())
        .unwrap_or_else(|| subject_code.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subject_has_five_units() {
        for subject in SUBJECTS {
            assert_eq!(subject.units.len(), 5, "{}", subject.code);
            assert!(subject.units.iter().all(|u| !u.topics.is_empty()));
        }
    }

    #[test]
    fn test_topics_are_unique_within_a_subject() {
        for subject in SUBJECTS {
            let mut topics: Vec<&str> = subject.units.iter().flat_map(|u| u.topics.iter().copied()).collect();
            let total = topics.len();
            topics.sort_unstable();
            topics.dedup();
            assert_eq!(topics.len(), total, "{}", subject.code);
        }
    }

    #[test]
    fn test_find_subject_ignores_case() {
        let subject = find_subject(" 315319-operating system ").expect("subject should exist");
        assert_eq!(subject.name, "Operating System");
        assert!(find_subject("999999-UNKNOWN").is_none());
    }

    #[test]
    fn test_unit_topics() {
        let topics = unit_topics("315319-OPERATING SYSTEM", "unit 3");
        assert_eq!(topics[0], "Memory Management");
        assert!(unit_topics("315319-OPERATING SYSTEM", "Unit 9").is_empty());
        assert!(unit_topics("unknown", "Unit 1").is_empty());
    }

    #[test]
    fn test_subject_name_falls_back_to_code() {
        assert_eq!(subject_name("315323-SOFTWARE ENGINEERING"), "Software Engineering");
        assert_eq!(subject_name("Astronomy"), "Astronomy");
    }
}
