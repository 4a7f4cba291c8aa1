// The suites module wires core checks to infra clients.
// Each suite is a fixed, ordered list of checks.

pub mod backend;
pub mod sheets;

use clap::ValueEnum;

/// Suites selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuiteName {
    /// Firebase auth plus the Gemini features.
    Backend,
    /// Google Sheets student import.
    Sheets,
    /// Every suite, backend first.
    All,
}

impl SuiteName {
    /// Expands `all` and drops duplicates while keeping first-seen order.
    pub fn expand(selected: &[SuiteName]) -> Vec<SuiteName> {
        let mut expanded = Vec::new();
        let requested: &[SuiteName] = if selected.is_empty() {
            &[SuiteName::All]
        } else {
            selected
        };

        for suite in requested {
            let concrete: &[SuiteName] = match suite {
                SuiteName::All => &[SuiteName::Backend, SuiteName::Sheets],
                SuiteName::Backend => &[SuiteName::Backend],
                SuiteName::Sheets => &[SuiteName::Sheets],
            };
            for name in concrete {
                if !expanded.contains(name) {
                    expanded.push(*name);
                }
            }
        }

        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_selection_means_all() {
        assert_eq!(
            SuiteName::expand(&[]),
            vec![SuiteName::Backend, SuiteName::Sheets]
        );
    }

    #[test]
    fn duplicates_are_dropped_in_order() {
        assert_eq!(
            SuiteName::expand(&[SuiteName::Sheets, SuiteName::All, SuiteName::Sheets]),
            vec![SuiteName::Sheets, SuiteName::Backend]
        );
        assert_eq!(SuiteName::expand(&[SuiteName::Backend]), vec![SuiteName::Backend]);
    }
}
