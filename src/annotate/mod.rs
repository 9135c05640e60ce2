//! Code Annotation
//!
//! Walks Python source with tree-sitter and attaches AI-generated trailing
//! comments to function definitions and top-level statements. Function
//! comments land on the last line of the function body; top-level statement
//! comments land on the statement's own line.
//!
//! When two units share a final line (a nested function ending where its
//! parent ends) the later annotation in traversal order replaces the earlier
//! one, because each annotated line is rebuilt from the original source line.
//! That last-write-wins behavior is pinned by tests.
//!
//! Source that does not parse is never rejected: the whole snippet gets a
//! single whole-text comment appended to the last line instead.

use tracing::{debug, warn};

use crate::ai::AiClient;
use crate::types::{CompanionError, FunctionComment, Result, SkillLevel};

/// Result of annotating one snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub annotated_code: String,
    pub functions: Vec<FunctionComment>,
}

/// An annotatable source unit found by the tree walk.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Unit {
    /// Function definition at any nesting depth. `end` is the zero-based row
    /// of the last line of the body, where the comment is attached. `source`
    /// is the definition's own text, which is what gets sent to the model.
    Function {
        name: String,
        source: String,
        end: usize,
    },
    /// Module-level expression statement on row `line`.
    Statement {
        line: usize,
    },
}

/// Annotate `code` with comments from `client` at the requested level.
///
/// One comment call per unit, issued sequentially in traversal order. Any
/// generation failure aborts the whole request; partial annotations are never
/// returned.
pub async fn annotate_source(
    code: &str,
    client: &dyn AiClient,
    level: SkillLevel,
) -> Result<Annotation> {
    let tree = parse_python(code);

    let units = match &tree {
        Some(tree) if !tree.root_node().has_error() => collect_units(tree.root_node(), code),
        _ => {
            // Malformed source: comment the snippet as a whole.
            warn!("Source failed to parse, falling back to whole-text annotation");
            let comment = client
                .get_comment(code, level)
                .await
                .map_err(CompanionError::annotation)?;
            return Ok(Annotation {
                annotated_code: format!("{code}  # {}", flatten(&comment)),
                functions: Vec::new(),
            });
        }
    };

    debug!(units = units.len(), "Collected annotatable units");

    let mut lines: Vec<String> = code.lines().map(str::to_string).collect();
    let mut functions = Vec::new();

    for unit in units {
        match unit {
            Unit::Function { name, source, end } => {
                let comment = client
                    .get_comment(&source, level)
                    .await
                    .map_err(CompanionError::annotation)?;
                let comment = flatten(&comment);
                if let Some(original) = code.lines().nth(end) {
                    lines[end] = format!("{original}  # {comment}");
                }
                functions.push(FunctionComment {
                    name,
                    comment,
                    level,
                });
            }
            Unit::Statement { line } => {
                let Some(original) = code.lines().nth(line) else {
                    continue;
                };
                let stripped = original.trim();
                if stripped.is_empty() {
                    continue;
                }
                let comment = client
                    .get_comment(stripped, level)
                    .await
                    .map_err(CompanionError::annotation)?;
                lines[line] = format!("{original}  # {}", flatten(&comment));
            }
        }
    }

    Ok(Annotation {
        annotated_code: lines.join("\n"),
        functions,
    })
}

fn parse_python(code: &str) -> Option<tree_sitter::Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .ok()?;
    parser.parse(code, None)
}

/// Pre-order walk collecting functions (any depth) and module-level
/// expression statements. `fn_depth` tracks how many enclosing function
/// definitions the cursor is inside: statements inside a function body are
/// covered by that function's comment and skipped.
fn collect_units(root: tree_sitter::Node<'_>, code: &str) -> Vec<Unit> {
    let mut units = Vec::new();
    walk(root, code, 0, &mut units);
    units
}

fn walk(node: tree_sitter::Node<'_>, code: &str, fn_depth: usize, units: &mut Vec<Unit>) {
    let mut child_depth = fn_depth;

    match node.kind() {
        "function_definition" => {
            let name = node
                .child_by_field_name("name")
                .and_then(|n| n.utf8_text(code.as_bytes()).ok())
                .unwrap_or("<anonymous>")
                .to_string();
            let source = node
                .utf8_text(code.as_bytes())
                .unwrap_or_default()
                .to_string();
            units.push(Unit::Function {
                name,
                source,
                end: node.end_position().row,
            });
            child_depth += 1;
        }
        "expression_statement" if fn_depth == 0 => {
            units.push(Unit::Statement {
                line: node.start_position().row,
            });
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        walk(child, code, child_depth, units);
    }
}

/// Collapse model output to a single line so the annotated snippet keeps the
/// same line count as the input.
fn flatten(comment: &str) -> String {
    comment.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockClient;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Stub that returns each queued comment in order and records prompts.
    struct ScriptedClient {
        responses: Mutex<Vec<String>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn new(responses: &[&str]) -> Self {
            let mut queue: Vec<String> = responses.iter().map(|s| s.to_string()).collect();
            queue.reverse();
            Self {
                responses: Mutex::new(queue),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AiClient for ScriptedClient {
        async fn get_comment(&self, code: &str, _level: SkillLevel) -> Result<String> {
            self.prompts.lock().unwrap().push(code.to_string());
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| "exhausted".to_string()))
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct FailingClient;

    #[async_trait]
    impl AiClient for FailingClient {
        async fn get_comment(&self, _code: &str, _level: SkillLevel) -> Result<String> {
            Err(CompanionError::Generation("model offline".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn annotates_single_function() {
        let code = "def f(x):\n    return x * 2";
        let client = MockClient::new();

        let result = annotate_source(code, &client, SkillLevel::Beginner)
            .await
            .unwrap();

        assert_eq!(result.functions.len(), 1);
        assert_eq!(result.functions[0].name, "f");
        assert_eq!(result.functions[0].level, SkillLevel::Beginner);
        assert!(result.annotated_code.starts_with("def f(x):\n    return x * 2  # "));
    }

    #[tokio::test]
    async fn preserves_line_count() {
        let code = "x = 1\n\ndef g():\n    pass\n\ny = compute(x)";
        let client = MockClient::new();

        let result = annotate_source(code, &client, SkillLevel::Advanced)
            .await
            .unwrap();

        assert_eq!(result.annotated_code.lines().count(), code.lines().count());
    }

    #[tokio::test]
    async fn malformed_source_gets_whole_text_fallback() {
        let code = "def broken(:\n    ???";
        let client = ScriptedClient::new(&["syntax is off"]);

        let result = annotate_source(code, &client, SkillLevel::Beginner)
            .await
            .unwrap();

        assert_eq!(result.annotated_code, format!("{code}  # syntax is off"));
        assert!(result.functions.is_empty());
        // Whole-text mode sends the entire snippet, once.
        assert_eq!(*client.prompts.lock().unwrap(), vec![code.to_string()]);
    }

    #[tokio::test]
    async fn nested_function_comment_wins_shared_last_line() {
        // inner and outer end on the same row; outer is visited first, so the
        // inner comment overwrites it on that line.
        let code = "def outer():\n    def inner():\n        return 1";
        let client = ScriptedClient::new(&["outer comment", "inner comment"]);

        let result = annotate_source(code, &client, SkillLevel::Beginner)
            .await
            .unwrap();

        assert_eq!(result.functions.len(), 2);
        assert_eq!(result.functions[0].name, "outer");
        assert_eq!(result.functions[1].name, "inner");
        assert!(result.annotated_code.ends_with("return 1  # inner comment"));
        assert!(!result.annotated_code.contains("outer comment"));
    }

    #[tokio::test]
    async fn statements_inside_functions_are_skipped() {
        let code = "def f():\n    print(\"inside\")\n\nprint(\"outside\")";
        let client = MockClient::new();

        let result = annotate_source(code, &client, SkillLevel::Beginner)
            .await
            .unwrap();

        let lines: Vec<&str> = result.annotated_code.lines().collect();
        // The call inside the body carries no comment of its own, but it is
        // the function's last line so the function comment lands there.
        assert!(lines[1].starts_with("    print(\"inside\")  # "));
        assert!(lines[3].starts_with("print(\"outside\")  # "));
        assert_eq!(result.functions.len(), 1);
    }

    #[tokio::test]
    async fn generation_failure_aborts_whole_request() {
        let code = "x = 1\ny = 2";

        let err = annotate_source(code, &FailingClient, SkillLevel::Beginner)
            .await
            .unwrap_err();

        assert!(matches!(err, CompanionError::Annotation { .. }));
    }

    #[tokio::test]
    async fn reannotation_is_deterministic_for_mock() {
        let code = "total = sum(values)";
        let client = MockClient::new();

        // Annotate once, then annotate the annotated output twice. The mock
        // holds no state, so the second pass is a pure function of its input.
        let once = annotate_source(code, &client, SkillLevel::Intermediate)
            .await
            .unwrap();
        let twice_a = annotate_source(&once.annotated_code, &client, SkillLevel::Intermediate)
            .await
            .unwrap();
        let twice_b = annotate_source(&once.annotated_code, &client, SkillLevel::Intermediate)
            .await
            .unwrap();

        assert_eq!(twice_a, twice_b);
    }
}
