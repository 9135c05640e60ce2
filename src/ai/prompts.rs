//! Prompt templates and token budgets, keyed by skill level.
//!
//! Prompts are opaque templates: a level-specific instruction concatenated
//! with the raw code. Budgets scale with the requested verbosity; beginner
//! output is the most verbose and gets the largest generation budget.

use crate::types::SkillLevel;

pub fn comment_prompt(code: &str, level: SkillLevel) -> String {
    match level {
        SkillLevel::Beginner => {
            format!("Explain this code concisely in 5 words max. Code:\n{code}")
        }
        SkillLevel::Intermediate => format!("Explain this code in 3 words max. Code:\n{code}"),
        SkillLevel::Advanced => format!("Explain this code in 1-2 words. Code:\n{code}"),
    }
}

/// Comments are short at every level; the budget is flat.
pub fn comment_budget(_level: SkillLevel) -> u32 {
    50
}

pub fn documentation_prompt(code: &str, level: SkillLevel) -> String {
    let instruction = match level {
        SkillLevel::Beginner => "Write detailed documentation. Max 50 words per function.",
        SkillLevel::Intermediate => "Write concise documentation. Max 25 words per function.",
        SkillLevel::Advanced => "Write minimal documentation. Max 10 words per function.",
    };
    format!("{instruction}\n\nCode:\n{code}")
}

pub fn documentation_budget(level: SkillLevel) -> u32 {
    match level {
        SkillLevel::Beginner => 300,
        SkillLevel::Intermediate => 200,
        SkillLevel::Advanced => 100,
    }
}

pub fn debug_prompt(code: &str, level: SkillLevel) -> String {
    let instruction = match level {
        SkillLevel::Beginner => {
            "Analyze this code, explain the first error in detail for a beginner. \
             Show corrected code in 15-20 words."
        }
        SkillLevel::Intermediate => {
            "Analyze this code, explain the first error concisely. \
             Show corrected code in 7-10 words."
        }
        SkillLevel::Advanced => {
            "Analyze this code, give minimal hints for the first error. \
             Show corrected code in 7 or fewer words."
        }
    };
    format!("{instruction}\n\nCode:\n{code}")
}

pub fn debug_budget(level: SkillLevel) -> u32 {
    documentation_budget(level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_embed_the_code() {
        let code = "def f():\n    pass";
        for level in [
            SkillLevel::Beginner,
            SkillLevel::Intermediate,
            SkillLevel::Advanced,
        ] {
            assert!(comment_prompt(code, level).contains(code));
            assert!(documentation_prompt(code, level).contains(code));
            assert!(debug_prompt(code, level).contains(code));
        }
    }

    #[test]
    fn budgets_shrink_with_skill() {
        assert!(
            documentation_budget(SkillLevel::Beginner)
                > documentation_budget(SkillLevel::Intermediate)
        );
        assert!(
            documentation_budget(SkillLevel::Intermediate)
                > documentation_budget(SkillLevel::Advanced)
        );
        assert_eq!(comment_budget(SkillLevel::Beginner), 50);
    }
}
