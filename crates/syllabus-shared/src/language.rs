//! Supported conversation languages and their fixed message catalogue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Conversation and template language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Ar,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ar => "ar",
        }
    }

    /// Human label shown in language pickers
    pub fn label(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Ar => "العربية",
        }
    }

    /// Inputs accepted as "yes, start the questionnaire".
    pub fn affirmatives(&self) -> &'static [&'static str] {
        match self {
            Language::En => &["yes", "ok", "sure", "yep", "go"],
            Language::Ar => &["نعم", "حسنًا", "تمام", "ابدأ", "ok", "go"],
        }
    }

    pub fn is_affirmative(&self, input: &str) -> bool {
        let normalized = input.trim().to_lowercase();
        self.affirmatives().iter().any(|a| *a == normalized)
    }

    pub fn messages(&self) -> &'static Messages {
        match self {
            Language::En => &EN_MESSAGES,
            Language::Ar => &AR_MESSAGES,
        }
    }

    /// Question prompt for the given key.
    pub fn question(&self, key: QuestionKey) -> &'static str {
        let idx = key as usize;
        match self {
            Language::En => EN_QUESTIONS[idx],
            Language::Ar => AR_QUESTIONS[idx],
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::En),
            "ar" | "arabic" => Ok(Language::Ar),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

/// The six fixed questionnaire fields, in the order they are asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKey {
    Title = 0,
    Level = 1,
    Audience = 2,
    Duration = 3,
    Language = 4,
    Description = 5,
}

impl QuestionKey {
    pub const ALL: [QuestionKey; 6] = [
        QuestionKey::Title,
        QuestionKey::Level,
        QuestionKey::Audience,
        QuestionKey::Duration,
        QuestionKey::Language,
        QuestionKey::Description,
    ];

    /// Placeholder name used in prompt templates
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKey::Title => "title",
            QuestionKey::Level => "level",
            QuestionKey::Audience => "audience",
            QuestionKey::Duration => "duration",
            QuestionKey::Language => "language",
            QuestionKey::Description => "description",
        }
    }

    pub fn from_index(index: usize) -> Option<QuestionKey> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for QuestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed assistant lines for one language.
#[derive(Debug)]
pub struct Messages {
    pub welcome: &'static str,
    pub reminder: &'static str,
    pub generating: &'static str,
    pub error_prefix: &'static str,
    pub warning_prefix: &'static str,
    pub another: &'static str,
    /// Contains a `{secs}` placeholder
    pub success: &'static str,
}

impl Messages {
    pub fn success_line(&self, secs: f64) -> String {
        self.success.replace("{secs}", &format!("{:.1}", secs))
    }
}

static EN_MESSAGES: Messages = Messages {
    welcome: "👋 Hello! I am your pedagogical assistant. Ready to generate a course scenario?",
    reminder: "Please type 'yes' to start.",
    generating: "⏳ Generating scenario, please wait...",
    error_prefix: "An error occurred:",
    warning_prefix: "⚠ Saved only partially:",
    another: "Would you like to generate another scenario?",
    success: "✅ Generated in {secs}s 🚀",
};

static AR_MESSAGES: Messages = Messages {
    welcome: "👋 مرحبًا! أنا مساعدك التربوي. هل أنت جاهز لإنشاء سيناريو دورة؟",
    reminder: "يرجى كتابة 'نعم' للبدء.",
    generating: "⏳ جاري إنشاء السيناريو، يرجى الانتظار...",
    error_prefix: "حدث خطأ:",
    warning_prefix: "⚠ تم الحفظ جزئيًا:",
    another: "هل ترغب في إنشاء سيناريو آخر؟",
    success: "✅ تم الإنشاء خلال {secs} ثانية 🚀",
};

static EN_QUESTIONS: [&str; 6] = [
    "📝 What is the course title?",
    "📈 What is the course level? (Beginner, Intermediate, Advanced)",
    "👥 Who is the target audience? (e.g., students, employees, high schoolers)",
    "⏳ What is the duration of the course? (weeks, days, etc.)",
    "🌍 What is the course language? (English, Arabic)",
    "🖊️ Provide a brief description of the course content.",
];

static AR_QUESTIONS: [&str; 6] = [
    "📝 ما هو عنوان الدورة؟",
    "📈 ما هو مستوى الدورة؟ (مبتدئ، متوسط، متقدم)",
    "👥 من هو الجمهور المستهدف؟ (مثل: طلاب، موظفين، تلاميذ)",
    "⏳ ما مدة الدورة؟ (أسابيع، أيام، إلخ)",
    "🌍 ما هي لغة الدورة؟ (إنجليزي، عربي)",
    "🖊️ قدم وصفًا موجزًا لمحتوى الدورة.",
];
