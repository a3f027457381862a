use serde::{Deserialize, Serialize};

/// Identifies one categorical question collected by the intake wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKey {
    Stage,
    DeviceType,
    Complexity,
    IpStatus,
    TimeCommitment,
    BudgetExpectation,
    EndGoal,
    BiggestConcern,
    EmployerType,
    Coinventors,
    TargetMarkets,
}

impl QuestionKey {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::Stage,
            Self::DeviceType,
            Self::Complexity,
            Self::IpStatus,
            Self::TimeCommitment,
            Self::BudgetExpectation,
            Self::EndGoal,
            Self::BiggestConcern,
            Self::EmployerType,
            Self::Coinventors,
            Self::TargetMarkets,
        ]
    }

    /// Wire name used by the intake payload.
    pub const fn data_key(self) -> &'static str {
        match self {
            Self::Stage => "stage",
            Self::DeviceType => "deviceType",
            Self::Complexity => "complexity",
            Self::IpStatus => "ipStatus",
            Self::TimeCommitment => "timeCommitment",
            Self::BudgetExpectation => "budgetExpectation",
            Self::EndGoal => "endGoal",
            Self::BiggestConcern => "biggestConcern",
            Self::EmployerType => "employerType",
            Self::Coinventors => "coinventors",
            Self::TargetMarkets => "targetMarkets",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Stage => "Development Stage",
            Self::DeviceType => "Device Type",
            Self::Complexity => "Complexity",
            Self::IpStatus => "IP Status",
            Self::TimeCommitment => "Time Available",
            Self::BudgetExpectation => "Budget Expectation",
            Self::EndGoal => "End Goal",
            Self::BiggestConcern => "Biggest Concern",
            Self::EmployerType => "Employment Status",
            Self::Coinventors => "Co-inventors",
            Self::TargetMarkets => "Target Markets",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub id: &'static str,
    pub key: QuestionKey,
    pub display_text: &'static str,
    pub options: Vec<&'static str>,
    pub why_we_ask: &'static str,
}

impl Question {
    pub fn accepts(&self, answer: &str) -> bool {
        self.options.iter().any(|option| *option == answer)
    }
}

/// The fixed question set the intake wizard walks through.
#[derive(Debug)]
pub struct QuestionCatalogue {
    questions: Vec<Question>,
}

impl QuestionCatalogue {
    pub fn standard() -> Self {
        Self {
            questions: standard_questions(),
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, key: QuestionKey) -> Option<&Question> {
        self.questions.iter().find(|question| question.key == key)
    }
}

fn standard_questions() -> Vec<Question> {
    vec![
        Question {
            id: "q1",
            key: QuestionKey::Stage,
            display_text: "What stage is your device idea?",
            options: vec![
                "Napkin sketch / concept only",
                "Detailed drawings or CAD models",
                "Basic prototype (non-functional or rough)",
                "Working prototype",
                "Already using informally in my practice",
            ],
            why_we_ask: "Determines starting point and how much work is already done.",
        },
        Question {
            id: "q2",
            key: QuestionKey::DeviceType,
            display_text: "What type of device is this?",
            options: vec![
                "Surgical instrument / tool",
                "Diagnostic device",
                "Therapeutic device",
                "Implant",
                "Dental device",
                "Veterinary device",
                "Software / digital health (SaMD)",
                "Other",
            ],
            why_we_ask: "Drives regulatory pathway logic and expertise matching.",
        },
        Question {
            id: "q3",
            key: QuestionKey::Complexity,
            display_text: "Is your device hardware-only, software-only, or a combination?",
            options: vec![
                "Hardware only (mechanical, electrical, or both)",
                "Software only (app, algorithm, SaMD)",
                "Hardware + Software combination",
                "Device + Drug combination",
            ],
            why_we_ask: "Combination products have different regulatory paths.",
        },
        Question {
            id: "q4",
            key: QuestionKey::IpStatus,
            display_text: "What's the current status of intellectual property protection?",
            options: vec![
                "No IP protection yet",
                "Provisional patent filed",
                "Full patent application filed",
                "Patent granted",
                "Not sure / need to check",
            ],
            why_we_ask: "Critical risk flag. No IP + sharing details = potential exposure.",
        },
        Question {
            id: "q5",
            key: QuestionKey::TimeCommitment,
            display_text: "How much time can you realistically commit to this project each week?",
            options: vec!["Less than 2 hours", "2-5 hours", "5-10 hours", "10+ hours"],
            why_we_ask: "Sets timeline expectations. Less time = longer project.",
        },
        Question {
            id: "q6",
            key: QuestionKey::BudgetExpectation,
            display_text:
                "What's your budget expectation for full development through FDA clearance?",
            options: vec![
                "Less than $50,000",
                "$50,000 - $150,000",
                "$150,000 - $300,000",
                "$300,000 - $500,000",
                "$500,000+",
                "I have no idea",
            ],
            why_we_ask: "Reality check trigger for budget expectations.",
        },
        Question {
            id: "q7",
            key: QuestionKey::EndGoal,
            display_text: "What's your end goal for this device?",
            options: vec![
                "Build a company around it",
                "License to an existing manufacturer",
                "Sell the IP outright",
                "Use in my own practice only",
                "Not sure yet",
            ],
            why_we_ask: "Shapes the entire development path.",
        },
        Question {
            id: "q8",
            key: QuestionKey::BiggestConcern,
            display_text: "What's your biggest concern right now?",
            options: vec![
                "I don't know where to start",
                "FDA/regulatory process seems impossible",
                "Cost and financial risk",
                "Time commitment while running my practice",
                "Finding the right development partners",
                "Protecting my idea / IP concerns",
            ],
            why_we_ask: "Emotional hook for personalization. Plan addresses this directly.",
        },
        Question {
            id: "q9",
            key: QuestionKey::EmployerType,
            display_text:
                "Are you employed by a hospital, academic institution, or healthcare system?",
            options: vec![
                "No - private practice or self-employed",
                "Yes - hospital employed",
                "Yes - academic/university",
                "Yes - healthcare system employed",
            ],
            why_we_ask: "Employment contracts often include IP assignment clauses.",
        },
        Question {
            id: "q10",
            key: QuestionKey::Coinventors,
            display_text: "Are there other inventors or stakeholders involved in this idea?",
            options: vec![
                "Just me",
                "Yes, 1-2 other people",
                "Yes, 3 or more people",
                "Working with a company already",
            ],
            why_we_ask: "Multiple inventors = IP ownership complexity.",
        },
        Question {
            id: "q11",
            key: QuestionKey::TargetMarkets,
            display_text: "Where do you intend to sell this device?",
            options: vec![
                "United States only",
                "US and Canada",
                "US and Europe",
                "Global",
                "Not sure yet",
            ],
            why_we_ask: "Different markets = different regulatory requirements.",
        },
    ]
}
