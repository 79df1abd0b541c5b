//! Short "thinking out loud" preview shown while a scenario is generated.

use crate::language::Language;
use regex::Regex;
use std::sync::OnceLock;

/// Weeks assumed when the duration answer does not name a week count.
pub const DEFAULT_WEEKS: u32 = 4;

fn weeks_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d+)\s*(?:weeks?|semaines?|أسابيع|أسبوع)").expect("weeks regex is valid")
    })
}

/// Extract the number of weeks from a free-text duration such as "6 weeks".
pub fn weeks_from_duration(duration: &str) -> u32 {
    weeks_re()
        .captures(&duration.to_lowercase())
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_WEEKS)
}

/// Build the reflection paragraph for a course about to be generated.
pub fn reflection(language: Language, title: &str, level: &str, duration: &str) -> String {
    let weeks = weeks_from_duration(duration);
    match language {
        Language::En => {
            let unit = if weeks > 1 { "weeks" } else { "week" };
            format!(
                "🤔 Alright, let's begin by designing a course titled \"{title}\" for {level} level learners. \
The course spans {weeks} {unit}.\n\n\
I'll start by identifying clear learning objectives relevant to the topic.\n\n\
Then, I'll create engaging Moodle activities logically distributed across {weeks} {unit}, \
ensuring progression from basics to advanced application.\n\n\
The teaching methods will emphasize interactivity: collaborative tasks, multimedia, and critical thinking.\n\n\
Assessment will include short quizzes and a final project, aligned with the course goals."
            )
        }
        Language::Ar => format!(
            "🤔 حسنًا، سأبدأ بتحليل طلب إعداد دورة بعنوان \"{title}\" موجهة للمتعلمين في مستوى {level}. \
مدة الدورة هي {weeks} أسبوعًا.\n\n\
سأحدد أهدافًا تعليمية واضحة لهذا الموضوع، مع أنشطة Moodle مناسبة موزعة على {weeks} أسبوعًا.\n\n\
طرق التدريس ستشمل استراتيجيات تفاعلية مثل العمل الجماعي، استخدام الوسائط، والتقييم الذاتي.\n\n\
التقييم سيكون متنوعًا بين اختبارات قصيرة ومشروع ختامي، يتماشى مع الأهداف."
        ),
    }
}
