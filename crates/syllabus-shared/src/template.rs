//! Prompt templates for scenario generation.
//!
//! One fixed template per supported language, each with the same six
//! placeholders. Substitution is a single pass, so answer text that happens
//! to contain `{...}` is inserted verbatim and never re-expanded.

use crate::error::{Result, SyllabusError};
use crate::language::{Language, QuestionKey};
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::OnceLock;

const EN_TEMPLATE: &str = "You are an educational expert. Help the teacher design the following pedagogical scenario based on the given info:

### Course Title : {title}
### Target Audience : {audience}
### Duration : {duration}
### Level : {level}
### Language : {language}
### Description : {description}

Provide a full, clear response formatted as:

### 🌟 Learning Objectives
- ...

### 📝 Moodle Activities (estimated duration)
- ...

### 🏫 Teaching Methods
- ...

### 📚 Resources
- ...

### 📊 Assessment
- ...

### 🗓️ Course Organization (4 weeks)
- Week 1 : ...
- Week 2 : ...
- Week 3 : ...
- Week 4 : ...
";

const AR_TEMPLATE: &str = "أنت خبير تربوي. ساعد المعلم في تصميم السيناريو التعليمي التالي بناءً على المعلومات التالية:

### عنوان الدورة : {title}
### الجمهور المستهدف : {audience}
### المدة : {duration}
### المستوى : {level}
### اللغة : {language}
### الوصف : {description}

اكتب رد كامل وواضح بالتنسيق التالي:

### 🌟 الأهداف التعليمية
- ...

### 📝 أنشطة Moodle (المدة المقدرة)
- ...

### 🏫 الطرق التعليمية
- ...

### 📚 الموارد
- ...

### 📊 التقييم
- ...

### 🗓️ تنظيم الدورة (4 أسابيع)
- الأسبوع 1 : ...
- الأسبوع 2 : ...
- الأسبوع 3 : ...
- الأسبوع 4 : ...
";

/// Raw template text for a language
pub fn template_for(language: Language) -> &'static str {
    match language {
        Language::En => EN_TEMPLATE,
        Language::Ar => AR_TEMPLATE,
    }
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder regex is valid"))
}

/// Render the prompt for `language`, binding all six questionnaire variables.
///
/// Fails with [`SyllabusError::MissingVariable`] naming the first absent key.
pub fn render(language: Language, variables: &BTreeMap<QuestionKey, String>) -> Result<String> {
    if let Some(missing) = QuestionKey::ALL
        .iter()
        .find(|key| !variables.contains_key(key))
    {
        return Err(SyllabusError::MissingVariable(missing.as_str().to_string()));
    }

    let rendered = placeholder_re().replace_all(template_for(language), |caps: &Captures| {
        let name = &caps[1];
        QuestionKey::ALL
            .iter()
            .find(|key| key.as_str() == name)
            .and_then(|key| variables.get(key))
            .cloned()
            .unwrap_or_else(|| caps[0].to_string())
    });

    Ok(rendered.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_variables() -> BTreeMap<QuestionKey, String> {
        QuestionKey::ALL
            .iter()
            .map(|k| (*k, format!("value-of-{}", k)))
            .collect()
    }

    #[test]
    fn test_render_contains_every_value() {
        let vars = full_variables();
        for lang in [Language::En, Language::Ar] {
            let prompt = render(lang, &vars).unwrap();
            for value in vars.values() {
                assert!(prompt.contains(value.as_str()), "{} missing in {}", value, lang);
            }
            assert!(!prompt.contains("{title}"));
        }
    }

    #[test]
    fn test_render_fails_for_each_missing_key() {
        for key in QuestionKey::ALL {
            let mut vars = full_variables();
            vars.remove(&key);
            match render(Language::En, &vars) {
                Err(SyllabusError::MissingVariable(name)) => assert_eq!(name, key.as_str()),
                other => panic!("expected MissingVariable for {}, got {:?}", key, other),
            }
        }
    }

    #[test]
    fn test_values_are_not_re_expanded() {
        let mut vars = full_variables();
        vars.insert(QuestionKey::Title, "Braces {audience} test".to_string());
        let prompt = render(Language::En, &vars).unwrap();
        assert!(prompt.contains("Braces {audience} test"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let vars = full_variables();
        assert_eq!(
            render(Language::Ar, &vars).unwrap(),
            render(Language::Ar, &vars).unwrap()
        );
    }
}
