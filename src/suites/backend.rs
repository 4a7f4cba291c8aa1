//! Backend checks for the teaching assistant: Firebase auth configuration and
//! the Gemini-powered features (chat, lesson plans, translation, quizzes).

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::harness::{Check, CheckOutcome, FailureReason, Harness, CheckError};
use crate::core::markers::{self, DEVANAGARI};
use crate::infra::ai::GeminiClient;
use crate::infra::firebase::FirebaseAuthClient;
use crate::infra::google_api::ApiReply;

pub const SUITE_TITLE: &str = "Ekatra UI Backend Testing";

const ASSISTANT_PROMPT: &str = "You are Alfred, an AI teaching assistant. Help the teacher with their question: What are effective classroom management strategies?";

const LESSON_PLAN_PROMPT: &str = "Generate a detailed lesson plan for a grade 5 class on the topic of 'Photosynthesis'. The lesson plan should be in English. Include learning objectives, materials needed, step-by-step activities, and an assessment method. Format your response using proper markdown with headers, bullet points, and sections.";

const TRANSLATION_PROMPT: &str = "Translate the following text from English to Hindi. Only provide the translation, no additional text or explanation: 'Good morning, students! Please submit your homework'";

const QUIZ_PROMPT: &str = "Create a quiz for grade 5 students on the topic of 'Solar System'. Generate 5 multiple choice questions with 4 options each. Format your response using proper markdown with headers, bullet points, and clear structure.";

const PREVIEW_CHARS: usize = 100;

/// Builds the backend suite in its fixed order.
pub fn backend_suite(gemini: Arc<GeminiClient>, firebase: Arc<FirebaseAuthClient>) -> Harness {
    Harness::new(SUITE_TITLE)
        .with_separator_width(50)
        .with_success_message("Backend functionality is working correctly.")
        .with_check(FirebaseConfigCheck { client: firebase })
        .with_check(AiContentCheck {
            name: "Gemini AI Integration",
            prompt: ASSISTANT_PROMPT,
            client: Arc::clone(&gemini),
            judge: judge_assistant_reply,
        })
        .with_check(AiContentCheck {
            name: "Lesson Plan Generation",
            prompt: LESSON_PLAN_PROMPT,
            client: Arc::clone(&gemini),
            judge: judge_lesson_plan,
        })
        .with_check(AiContentCheck {
            name: "Translation Functionality",
            prompt: TRANSLATION_PROMPT,
            client: Arc::clone(&gemini),
            judge: judge_translation,
        })
        .with_check(AiContentCheck {
            name: "Quiz Generation",
            prompt: QUIZ_PROMPT,
            client: gemini,
            judge: judge_quiz,
        })
        .with_failure_hints(&[
            "Check that GEMINI_API_KEY and FIREBASE_API_KEY are set and unrestricted",
            "Ensure the Generative Language API is enabled for the Gemini key's project",
        ])
}

// =============================================================================
// FIREBASE
// =============================================================================

/// A valid web API key makes Identity Toolkit reject an empty sign-up with
/// `MISSING_EMAIL`; that rejection is the pass signal.
pub struct FirebaseConfigCheck {
    client: Arc<FirebaseAuthClient>,
}

#[async_trait]
impl Check for FirebaseConfigCheck {
    fn name(&self) -> &str {
        "Firebase Configuration"
    }

    async fn run(&self) -> Result<CheckOutcome, CheckError> {
        let reply = self.client.empty_sign_up().await?;
        Ok(judge_firebase_sign_up(reply))
    }
}

fn judge_firebase_sign_up(reply: ApiReply<serde_json::Value>) -> CheckOutcome {
    match reply {
        ApiReply::Failure(failure)
            if failure.status == 400 && failure.error_mentions("MISSING_EMAIL") =>
        {
            CheckOutcome::passed("Firebase API key is valid")
        }
        ApiReply::Failure(failure) => {
            tracing::warn!("Unexpected Firebase response: {}", failure.status);
            CheckOutcome::unexpected_status(failure.status, failure.body)
        }
        ApiReply::Success(body) => {
            tracing::warn!("Unexpected Firebase response: empty sign-up was accepted");
            CheckOutcome::content_mismatch(format!(
                "empty sign-up was accepted with a 2xx response: {}",
                body
            ))
        }
    }
}

// =============================================================================
// GEMINI
// =============================================================================

/// Sends one prompt and hands the generated text to `judge`.
pub struct AiContentCheck {
    name: &'static str,
    prompt: &'static str,
    client: Arc<GeminiClient>,
    judge: fn(&str) -> CheckOutcome,
}

#[async_trait]
impl Check for AiContentCheck {
    fn name(&self) -> &str {
        self.name
    }

    async fn run(&self) -> Result<CheckOutcome, CheckError> {
        tracing::debug!("{} using model {}", self.name, self.client.model());
        let reply = self.client.generate_text(self.prompt).await?;
        Ok(judge_generation(reply, self.judge))
    }
}

fn judge_generation(
    reply: ApiReply<Option<String>>,
    judge: fn(&str) -> CheckOutcome,
) -> CheckOutcome {
    match reply {
        ApiReply::Success(Some(text)) => judge(&text),
        ApiReply::Success(None) => CheckOutcome::content_mismatch("no content in AI response"),
        ApiReply::Failure(failure) => {
            tracing::error!(
                "Gemini request failed with status {}: {}",
                failure.status,
                failure.body
            );
            CheckOutcome::Failed(FailureReason::UnexpectedStatus {
                status: failure.status,
                body: failure.message_or_unknown().to_string(),
            })
        }
    }
}

fn judge_assistant_reply(text: &str) -> CheckOutcome {
    tracing::info!(
        "📝 AI Response Preview: {}...",
        markers::preview(text, PREVIEW_CHARS)
    );
    if markers::has_markdown(text) {
        CheckOutcome::passed("AI response contains structured content (markdown)")
    } else {
        tracing::warn!("⚠️ AI response may not be properly formatted");
        CheckOutcome::passed("AI response received without markdown structure")
    }
}

fn judge_lesson_plan(text: &str) -> CheckOutcome {
    let analysis = markers::analyze_lesson_plan(text);
    let summary = format!(
        "Found {}/{} lesson plan components",
        analysis.components_found, analysis.components_expected
    );

    if !analysis.has_formatting {
        tracing::warn!("⚠️ Lesson plan may lack proper formatting");
    }

    if analysis.is_acceptable() {
        CheckOutcome::passed(format!("📚 {}, markdown formatted", summary))
    } else if !analysis.has_formatting {
        CheckOutcome::content_mismatch(format!("{}, no markdown formatting", summary))
    } else {
        CheckOutcome::content_mismatch(summary)
    }
}

fn judge_translation(text: &str) -> CheckOutcome {
    if markers::contains_script(text, &DEVANAGARI) {
        CheckOutcome::passed(format!("🌐 Translation: {}", text.trim()))
    } else {
        CheckOutcome::content_mismatch("translation contains no Hindi (Devanagari) characters")
    }
}

fn judge_quiz(text: &str) -> CheckOutcome {
    let analysis = markers::analyze_quiz(text);
    if !analysis.has_options {
        tracing::warn!("⚠️ Quiz may not have proper multiple choice format");
    }

    if analysis.is_acceptable() {
        CheckOutcome::passed(format!(
            "❓ Found {} quiz indicators in multiple choice format",
            analysis.indicators_found
        ))
    } else {
        CheckOutcome::content_mismatch(format!(
            "found {} quiz indicators, multiple choice options {}",
            analysis.indicators_found,
            if analysis.has_options { "present" } else { "missing" }
        ))
    }
}
