//! `WriteTodos`: lets the model record/replace its working task list.
//!
//! The list itself is not persisted anywhere the dispatcher can see; a tool
//! like this only exists to give the model an explicit scratchpad that
//! shows up in the transcript, so this handler's job is entirely about
//! validating shape and formatting a response, not storage.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use wisp_protocol::ToolOutput;
use wisp_protocol::ToolOutputExt;
use wisp_tools_api::ToolContext;

use crate::Tool;
use crate::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Deserialize)]
struct TodoItem {
    description: String,
    status: TodoStatus,
}

#[derive(Debug, Deserialize)]
struct WriteTodosArgs {
    #[serde(default)]
    todos: Vec<TodoItem>,
}

pub struct WriteTodosTool;

#[async_trait]
impl Tool for WriteTodosTool {
    fn name(&self) -> &str {
        "WriteTodos"
    }

    fn description(&self) -> &str {
        "Replace the current task list with a new set of todos. Call with an empty list to clear it."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "todos": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "description": {"type": "string"},
                            "status": {"type": "string", "enum": ["pending", "in_progress", "completed"]}
                        },
                        "required": ["description", "status"]
                    }
                }
            },
            "required": ["todos"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        let args: WriteTodosArgs = serde_json::from_value(input)?;
        validate_todos(&args.todos)?;
        Ok(ToolOutput::text(format_todo_response(&args.todos)))
    }
}

fn validate_todos(todos: &[TodoItem]) -> Result<(), ToolError> {
    if todos.iter().any(|t| t.description.trim().is_empty()) {
        return Err(ToolError::invalid_input("todo description must not be empty"));
    }
    let in_progress_count = todos.iter().filter(|t| t.status == TodoStatus::InProgress).count();
    if in_progress_count > 1 {
        return Err(ToolError::invalid_input("at most one todo may be in_progress at a time"));
    }
    Ok(())
}

fn format_todo_response(todos: &[TodoItem]) -> String {
    if todos.is_empty() {
        return "Successfully cleared the todo list.".to_string();
    }
    todos
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let marker = match t.status {
                TodoStatus::Pending => "[ ]",
                TodoStatus::InProgress => "[~]",
                TodoStatus::Completed => "[x]",
            };
            format!("{}. {} {}", i + 1, marker, t.description)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_util::sync::CancellationToken;
    use wisp_approval::ApprovalGate;
    use wisp_tools_api::Injector;
    use wisp_wire::new_wire;

    use super::*;

    fn ctx() -> ToolContext {
        let pair = new_wire();
        ToolContext::new(
            "/tmp",
            Arc::new(pair.engine),
            Arc::new(ApprovalGate::new()),
            CancellationToken::new(),
            Injector::new(),
        )
    }

    #[tokio::test]
    async fn empty_list_clears_todos() {
        let tool = WriteTodosTool;
        let mut c = ctx();
        let output = tool.execute(serde_json::json!({"todos": []}), &mut c).await.expect("execute");
        assert_eq!(output.content.as_model_text(), "Successfully cleared the todo list.");
    }

    #[tokio::test]
    async fn formats_numbered_list_with_status_markers() {
        let tool = WriteTodosTool;
        let mut c = ctx();
        let output = tool
            .execute(
                serde_json::json!({"todos": [
                    {"description": "write tests", "status": "in_progress"},
                    {"description": "ship it", "status": "pending"}
                ]}),
                &mut c,
            )
            .await
            .expect("execute");
        let text = output.content.as_model_text();
        assert!(text.contains("[~] write tests"));
        assert!(text.contains("[ ] ship it"));
    }

    #[tokio::test]
    async fn rejects_two_in_progress_todos() {
        let tool = WriteTodosTool;
        let mut c = ctx();
        let err = tool
            .execute(
                serde_json::json!({"todos": [
                    {"description": "a", "status": "in_progress"},
                    {"description": "b", "status": "in_progress"}
                ]}),
                &mut c,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn rejects_empty_description() {
        let tool = WriteTodosTool;
        let mut c = ctx();
        let err = tool
            .execute(serde_json::json!({"todos": [{"description": "  ", "status": "pending"}]}), &mut c)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput { .. }));
    }
}
