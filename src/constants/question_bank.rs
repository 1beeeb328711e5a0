/// A curated multiple choice question used by the local generator.
#[derive(Debug, Clone, Copy)]
pub struct BankQuestion {
    pub question: &'static str,
    pub options: [&'static str; 4],
    pub correct_answer: &'static str,
    pub explanation: &'static str,
}

/// A topic-parameterised question. `{topic}` and `{subject}` are substituted.
#[derive(Debug, Clone, Copy)]
pub struct QuestionStem {
    pub question: &'static str,
    pub correct_answer: &'static str,
    pub distractors: [&'static str; 3],
    pub explanation: &'static str,
}

pub const OPERATING_SYSTEM_BANK: &[BankQuestion] = &[
    BankQuestion {
        question: "What is the primary function of an operating system?",
        options: [
            "To manage hardware and software resources",
            "To only run applications",
            "To connect to the internet",
            "To store user data",
        ],
        correct_answer: "To manage hardware and software resources",
        explanation: "The primary function of an OS is to manage hardware and software resources efficiently.",
    },
    BankQuestion {
        question: "Which scheduling algorithm provides the shortest average waiting time?",
        options: [
            "Shortest Job First (SJF)",
            "First Come First Serve (FCFS)",
            "Round Robin",
            "Priority Scheduling",
        ],
        correct_answer: "Shortest Job First (SJF)",
        explanation: "SJF minimises average waiting time by always running the shortest job next.",
    },
    BankQuestion {
        question: "What is virtual memory used for?",
        options: [
            "To extend RAM using disk space",
            "To increase CPU speed",
            "To improve network performance",
            "To enhance graphics quality",
        ],
        correct_answer: "To extend RAM using disk space",
        explanation: "Virtual memory backs the address space with disk so programs can exceed physical RAM.",
    },
    BankQuestion {
        question: "Which memory management technique eliminates external fragmentation?",
        options: [
            "Paging",
            "Segmentation",
            "Contiguous allocation",
            "Dynamic partitioning",
        ],
        correct_answer: "Paging",
        explanation: "Paging divides memory into fixed-size frames, so free memory is never split into unusable holes.",
    },
    BankQuestion {
        question: "What is the purpose of a file system?",
        options: [
            "To organize and store data persistently",
            "To manage network connections",
            "To control hardware devices",
            "To handle user authentication",
        ],
        correct_answer: "To organize and store data persistently",
        explanation: "File systems organise data into files and directories on persistent storage.",
    },
    BankQuestion {
        question: "Which process state indicates a process is waiting for I/O?",
        options: ["Blocked/Waiting", "Ready", "Running", "Terminated"],
        correct_answer: "Blocked/Waiting",
        explanation: "A blocked process cannot run until its I/O request completes.",
    },
    BankQuestion {
        question: "What is the main advantage of multiprogramming?",
        options: [
            "Increased CPU utilization",
            "Faster execution of a single program",
            "Reduced memory usage",
            "Better user interface",
        ],
        correct_answer: "Increased CPU utilization",
        explanation: "Keeping several programs in memory lets the CPU switch to another job when one waits.",
    },
    BankQuestion {
        question: "Which synchronization mechanisms can prevent race conditions?",
        options: [
            "All of the above",
            "Mutex (Mutual Exclusion)",
            "Semaphore",
            "Monitor",
        ],
        correct_answer: "All of the above",
        explanation: "Mutexes, semaphores and monitors all serialise access to shared state.",
    },
    BankQuestion {
        question: "What is the purpose of a device driver?",
        options: [
            "To provide an interface between the OS and hardware",
            "To manage user accounts",
            "To control network traffic",
            "To handle file operations",
        ],
        correct_answer: "To provide an interface between the OS and hardware",
        explanation: "Drivers translate generic OS requests into device specific operations.",
    },
    BankQuestion {
        question: "Which memory allocation strategy suits variable-sized processes?",
        options: [
            "Dynamic partitioning",
            "Fixed partitioning",
            "Paging",
            "Segmentation",
        ],
        correct_answer: "Dynamic partitioning",
        explanation: "Dynamic partitioning sizes each partition to the process that occupies it.",
    },
];

pub const SOFTWARE_ENGINEERING_BANK: &[BankQuestion] = &[
    BankQuestion {
        question: "What is the first phase of the Software Development Life Cycle (SDLC)?",
        options: ["Requirements Analysis", "Design", "Implementation", "Testing"],
        correct_answer: "Requirements Analysis",
        explanation: "Requirements are gathered and analysed before any design work starts.",
    },
    BankQuestion {
        question: "Which development model suits projects with unclear requirements?",
        options: ["Agile/Scrum", "Waterfall", "Spiral", "V-Model"],
        correct_answer: "Agile/Scrum",
        explanation: "Agile iterations let requirements evolve with frequent feedback.",
    },
    BankQuestion {
        question: "What is the purpose of UML diagrams in software engineering?",
        options: [
            "To visualize and document software design",
            "To write code automatically",
            "To test software",
            "To deploy applications",
        ],
        correct_answer: "To visualize and document software design",
        explanation: "UML is a modelling notation for structure and behaviour of a system.",
    },
    BankQuestion {
        question: "Which testing technique focuses on individual components?",
        options: [
            "Unit Testing",
            "Integration Testing",
            "System Testing",
            "Acceptance Testing",
        ],
        correct_answer: "Unit Testing",
        explanation: "Unit tests exercise the smallest testable parts of the code in isolation.",
    },
    BankQuestion {
        question: "What is the main goal of software maintenance?",
        options: [
            "To keep software operational and up-to-date",
            "To add new features only",
            "To fix bugs only",
            "To improve performance only",
        ],
        correct_answer: "To keep software operational and up-to-date",
        explanation: "Maintenance covers corrective, adaptive, perfective and preventive changes.",
    },
];

pub const DATA_ANALYTICS_BANK: &[BankQuestion] = &[
    BankQuestion {
        question: "What is the primary goal of data analytics?",
        options: [
            "To extract meaningful insights from data",
            "To store large amounts of data",
            "To create databases",
            "To write code",
        ],
        correct_answer: "To extract meaningful insights from data",
        explanation: "Analytics turns raw data into patterns and conclusions that support decisions.",
    },
    BankQuestion {
        question: "Which statistical measures indicate the central tendency of data?",
        options: [
            "Mean, Median, Mode",
            "Standard Deviation",
            "Variance",
            "Range",
        ],
        correct_answer: "Mean, Median, Mode",
        explanation: "Mean, median and mode describe the centre of a distribution.",
    },
    BankQuestion {
        question: "What is the purpose of data visualization?",
        options: [
            "To present data graphically for better understanding",
            "To store data efficiently",
            "To clean data",
            "To analyze data statistically",
        ],
        correct_answer: "To present data graphically for better understanding",
        explanation: "Charts expose trends and outliers that are hard to see in tables.",
    },
    BankQuestion {
        question: "Which type of analytics focuses on predicting future outcomes?",
        options: [
            "Predictive Analytics",
            "Descriptive Analytics",
            "Diagnostic Analytics",
            "Prescriptive Analytics",
        ],
        correct_answer: "Predictive Analytics",
        explanation: "Predictive analytics models historical data to forecast what happens next.",
    },
    BankQuestion {
        question: "What is the main advantage of machine learning in data analytics?",
        options: [
            "To automatically identify patterns in data",
            "To store data faster",
            "To create reports",
            "To visualize data",
        ],
        correct_answer: "To automatically identify patterns in data",
        explanation: "Learning algorithms find relationships in large datasets without hand-written rules.",
    },
];

pub const GENERIC_STEMS: &[QuestionStem] = &[
    QuestionStem {
        question: "What is the primary purpose of {topic} in {subject}?",
        correct_answer: "To manage and optimize {topic} processes",
        distractors: [
            "To ignore {topic} completely",
            "To avoid {topic} implementation",
            "To simplify {topic} unnecessarily",
        ],
        explanation: "The primary purpose of {topic} is to manage and optimize related processes effectively.",
    },
    QuestionStem {
        question: "Which statement best describes {topic}?",
        correct_answer: "A core concept of {subject} that structures how related problems are solved",
        distractors: [
            "A deprecated practice with no modern use",
            "A hardware component unrelated to {subject}",
            "A naming convention only",
        ],
        explanation: "{topic} is a foundational idea in {subject}.",
    },
    QuestionStem {
        question: "Why is studying {topic} important for {subject}?",
        correct_answer: "It explains behaviour that later topics build on",
        distractors: [
            "It is only needed for historical interest",
            "It replaces the need for practical work",
            "It applies only to a single vendor",
        ],
        explanation: "Later material in {subject} assumes a working understanding of {topic}.",
    },
    QuestionStem {
        question: "What is a common mistake when applying {topic}?",
        correct_answer: "Applying it without checking its assumptions",
        distractors: [
            "Documenting how it was applied",
            "Testing the result afterwards",
            "Reviewing it with peers",
        ],
        explanation: "Most errors with {topic} come from ignoring the conditions it depends on.",
    },
    QuestionStem {
        question: "Which activity best reinforces understanding of {topic}?",
        correct_answer: "Solving practice problems on {topic}",
        distractors: [
            "Memorising the chapter title",
            "Skipping the examples",
            "Reading only the summary once",
        ],
        explanation: "Practice problems force active recall of how {topic} works.",
    },
];

/// Curated bank for a subject, matched on the subject name.
pub fn bank_for_subject(subject_id: &str) -> &'static [BankQuestion] {
    let subject = subject_id.to_lowercase();
    if subject.contains("operating system") {
        OPERATING_SYSTEM_BANK
    } else if subject.contains("software engineering") {
        SOFTWARE_ENGINEERING_BANK
    } else if subject.contains("data analytics") {
        DATA_ANALYTICS_BANK
    } else {
        &[]
    }
}

impl QuestionStem {
    pub fn fill(template: &str, topic: &str, subject: &str) -> String {
        template.replace("{topic}", topic).replace("{subject}", subject)
    }
}
