//! Conversational intake state machine.
//!
//! Steps: 0 idle, 1 awaiting confirmation, 2..=7 collecting the answer for
//! question `step - 2`. The session never performs I/O: when the last answer
//! arrives, [`IntakeSession::handle`] hands back a [`GenerationRequest`] and
//! the host reports the result through [`IntakeSession::complete`], which
//! returns the session to idle.

use crate::error::Result;
use crate::generation::{GenerationOutcome, GenerationRequest};
use crate::language::{Language, QuestionKey};
use crate::reflection::reflection;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STEP_IDLE: u8 = 0;
pub const STEP_AWAITING_CONFIRMATION: u8 = 1;
pub const STEP_FIRST_QUESTION: u8 = 2;
pub const STEP_LAST_QUESTION: u8 = STEP_FIRST_QUESTION + QuestionKey::ALL.len() as u8 - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub message: String,
}

/// Outcome of one user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Assistant lines to show; the conversation continues.
    Reply(Vec<String>),
    /// Every answer is in. The host must run generation and then call
    /// [`IntakeSession::complete`].
    Generate {
        replies: Vec<String>,
        request: GenerationRequest,
    },
}

impl Turn {
    pub fn replies(&self) -> &[String] {
        match self {
            Turn::Reply(replies) => replies,
            Turn::Generate { replies, .. } => replies,
        }
    }
}

/// One user's in-progress questionnaire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeSession {
    step: u8,
    answers: BTreeMap<QuestionKey, String>,
    history: Vec<HistoryEntry>,
    language: Language,
}

impl IntakeSession {
    pub fn new(language: Language) -> Self {
        Self {
            step: STEP_IDLE,
            answers: BTreeMap::new(),
            history: Vec::new(),
            language,
        }
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn answers(&self) -> &BTreeMap<QuestionKey, String> {
        &self.answers
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Question currently awaiting an answer, if any.
    pub fn pending_question(&self) -> Option<QuestionKey> {
        if self.awaiting_generation() {
            return None;
        }
        self.step
            .checked_sub(STEP_FIRST_QUESTION)
            .and_then(|idx| QuestionKey::from_index(idx as usize))
    }

    /// True between the last answer and the matching `complete` call.
    pub fn awaiting_generation(&self) -> bool {
        self.step == STEP_LAST_QUESTION && self.answers.len() == QuestionKey::ALL.len()
    }

    /// Move from idle to awaiting confirmation and greet the user.
    ///
    /// No-op once the session has started.
    pub fn start(&mut self) -> Vec<String> {
        if self.step != STEP_IDLE {
            return Vec::new();
        }
        self.step = STEP_AWAITING_CONFIRMATION;
        let welcome = self.language.messages().welcome.to_string();
        self.say(&welcome);
        vec![welcome]
    }

    /// Feed one line of user input.
    ///
    /// Blank input is ignored. Input while idle restarts the conversation and
    /// is then treated as the confirmation.
    pub fn handle(&mut self, input: &str) -> Turn {
        if input.trim().is_empty() {
            return Turn::Reply(Vec::new());
        }

        self.history.push(HistoryEntry {
            role: Role::User,
            message: input.to_string(),
        });

        let mut replies = self.start();

        if self.awaiting_generation() {
            let msg = self.language.messages().generating.to_string();
            self.say(&msg);
            replies.push(msg);
            return Turn::Reply(replies);
        }

        if self.step == STEP_AWAITING_CONFIRMATION {
            let msg = if self.language.is_affirmative(input) {
                self.step = STEP_FIRST_QUESTION;
                self.language.question(QuestionKey::Title).to_string()
            } else {
                self.language.messages().reminder.to_string()
            };
            self.say(&msg);
            replies.push(msg);
            return Turn::Reply(replies);
        }

        let Some(key) = self.pending_question() else {
            return Turn::Reply(replies);
        };
        self.answers.insert(key, input.to_string());

        match QuestionKey::from_index(key as usize + 1) {
            Some(next) => {
                self.step += 1;
                let msg = self.language.question(next).to_string();
                self.say(&msg);
                replies.push(msg);
                Turn::Reply(replies)
            }
            None => {
                let request = GenerationRequest::new(self.language, self.answers.clone());
                let generating = self.language.messages().generating.to_string();
                let preview = reflection(
                    self.language,
                    request.title(),
                    request.level(),
                    request.answer(QuestionKey::Duration).unwrap_or_default(),
                );
                self.say(&generating);
                self.say(&preview);
                replies.push(generating);
                replies.push(preview);
                Turn::Generate { replies, request }
            }
        }
    }

    /// Report the generation result and reset to idle.
    pub fn complete(&mut self, result: &Result<GenerationOutcome>) -> Vec<String> {
        let messages = self.language.messages();
        let mut replies = Vec::new();

        match result {
            Ok(outcome) => {
                replies.push(outcome.scenario.clone());
                replies.push(messages.success_line(outcome.elapsed.as_secs_f64()));
                for warning in outcome.warnings() {
                    replies.push(format!("{} {}", messages.warning_prefix, warning));
                }
            }
            Err(e) => replies.push(format!("{} {}", messages.error_prefix, e)),
        }

        self.reset();
        replies.push(messages.another.to_string());

        for reply in &replies {
            self.say(reply);
        }
        replies
    }

    /// Drop collected answers and return to idle. History is kept.
    pub fn reset(&mut self) {
        self.step = STEP_IDLE;
        self.answers.clear();
    }

    fn say(&mut self, message: &str) {
        self.history.push(HistoryEntry {
            role: Role::Assistant,
            message: message.to_string(),
        });
    }
}
