//! Heuristics for judging generated text.
//!
//! The AI checks cannot compare against a fixed answer, so they look for
//! structural markers instead: markdown syntax, expected section keywords,
//! script ranges and multiple-choice option labels.

use std::ops::RangeInclusive;

/// Any of these counts as markdown-ish structure.
pub const MARKDOWN_MARKERS: &[&str] = &["#", "*", "-", "1.", "2."];

/// Sections a lesson plan is expected to mention. Matched case-insensitively.
pub const LESSON_PLAN_COMPONENTS: &[&str] = &["objective", "material", "activity", "assessment"];

/// Minimum number of lesson plan components for the check to pass.
pub const LESSON_PLAN_MIN_COMPONENTS: usize = 2;

/// Quiz indicators. Matched case-sensitively.
pub const QUIZ_INDICATORS: &[&str] = &["?", "Question", "Q1", "Q2", "A)", "B)", "C)", "D)"];

pub const QUIZ_MIN_INDICATORS: usize = 4;

pub const DEVANAGARI: RangeInclusive<char> = '\u{0900}'..='\u{097F}';

pub fn has_markdown(text: &str) -> bool {
    MARKDOWN_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Counts how many distinct markers occur at least once in `text`.
pub fn count_markers(text: &str, markers: &[&str]) -> usize {
    markers.iter().filter(|marker| text.contains(*marker)).count()
}

pub fn count_markers_ignore_case(text: &str, markers: &[&str]) -> usize {
    let lowered = text.to_lowercase();
    markers
        .iter()
        .filter(|marker| lowered.contains(&marker.to_lowercase()))
        .count()
}

pub fn contains_script(text: &str, range: &RangeInclusive<char>) -> bool {
    text.chars().any(|c| range.contains(&c))
}

/// Verdict on a generated lesson plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonPlanAnalysis {
    pub components_found: usize,
    pub components_expected: usize,
    pub has_formatting: bool,
}

impl LessonPlanAnalysis {
    pub fn is_acceptable(&self) -> bool {
        self.components_found >= LESSON_PLAN_MIN_COMPONENTS && self.has_formatting
    }
}

pub fn analyze_lesson_plan(text: &str) -> LessonPlanAnalysis {
    LessonPlanAnalysis {
        components_found: count_markers_ignore_case(text, LESSON_PLAN_COMPONENTS),
        components_expected: LESSON_PLAN_COMPONENTS.len(),
        has_formatting: has_markdown(text),
    }
}

/// Verdict on a generated quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizAnalysis {
    pub indicators_found: usize,
    pub has_options: bool,
}

impl QuizAnalysis {
    pub fn is_acceptable(&self) -> bool {
        self.indicators_found >= QUIZ_MIN_INDICATORS && self.has_options
    }
}

pub fn analyze_quiz(text: &str) -> QuizAnalysis {
    QuizAnalysis {
        indicators_found: count_markers(text, QUIZ_INDICATORS),
        has_options: text.contains("A)") && text.contains("B)"),
    }
}

/// First `max_chars` characters, never splitting a code point.
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_detection() {
        assert!(has_markdown("# Title"));
        assert!(has_markdown("1. first"));
        assert!(has_markdown("some - dash"));
        assert!(!has_markdown("Plain prose with no structure"));
    }

    #[test]
    fn lesson_plan_with_three_components_passes() {
        let text = "# Plan\n- obj\n- materials\n- activity\n- assessment";
        let analysis = analyze_lesson_plan(text);
        // "obj" alone does not count as "objective"
        assert_eq!(analysis.components_found, 3);
        assert_eq!(analysis.components_expected, 4);
        assert!(analysis.has_formatting);
        assert!(analysis.is_acceptable());
    }

    #[test]
    fn lesson_plan_components_ignore_case() {
        let analysis = analyze_lesson_plan("OBJECTIVES and Materials");
        assert_eq!(analysis.components_found, 2);
        assert!(!analysis.has_formatting);
        assert!(!analysis.is_acceptable());
    }

    #[test]
    fn lesson_plan_needs_two_components() {
        let analysis = analyze_lesson_plan("# Photosynthesis\n- Activity: draw a leaf");
        assert_eq!(analysis.components_found, 1);
        assert!(!analysis.is_acceptable());
    }

    #[test]
    fn devanagari_detection() {
        assert!(contains_script("सुप्रभात, छात्रों!", &DEVANAGARI));
        assert!(!contains_script("Good morning, students!", &DEVANAGARI));
        // Bengali sits just above the Devanagari block
        assert!(!contains_script("সুপ্রভাত", &DEVANAGARI));
    }

    #[test]
    fn quiz_with_options_passes() {
        let text = "## Question 1\nWhich planet is closest to the Sun?\nA) Venus\nB) Mercury\nC) Mars\nD) Earth";
        let analysis = analyze_quiz(text);
        assert_eq!(analysis.indicators_found, 6);
        assert!(analysis.has_options);
        assert!(analysis.is_acceptable());
    }

    #[test]
    fn quiz_without_option_labels_fails() {
        let text = "Question 1: Which planet is biggest?\nQ1 answer: Jupiter\nQ2 ...";
        let analysis = analyze_quiz(text);
        assert_eq!(analysis.indicators_found, 4);
        assert!(!analysis.has_options);
        assert!(!analysis.is_acceptable());
    }

    #[test]
    fn quiz_markers_are_case_sensitive() {
        assert_eq!(count_markers("question q1 a)", QUIZ_INDICATORS), 0);
    }

    #[test]
    fn preview_respects_char_boundaries() {
        assert_eq!(preview("नमस्ते दुनिया", 3), "नमस");
        assert_eq!(preview("short", 100), "short");
    }
}
