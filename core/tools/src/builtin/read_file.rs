//! `Read`: reads a UTF-8 file relative to the workspace root.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use wisp_protocol::ConcurrencySafety;
use wisp_protocol::ToolOutput;
use wisp_protocol::ToolOutputExt;
use wisp_tools_api::ToolContext;

use crate::Tool;
use crate::ToolError;

pub struct ReadFileTool;

#[derive(Deserialize)]
struct ReadFileArgs {
    file_path: String,
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "Read"
    }

    fn description(&self) -> &str {
        "Read the contents of a file within the workspace."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to the file, relative to the workspace root."
                }
            },
            "required": ["file_path"]
        })
    }

    fn concurrency_safety(&self) -> ConcurrencySafety {
        ConcurrencySafety::Safe
    }

    async fn execute(&self, input: Value, ctx: &mut ToolContext) -> Result<ToolOutput, ToolError> {
        let args: ReadFileArgs = serde_json::from_value(input)?;
        let path = ctx.workspace_root().join(&args.file_path);
        let content = tokio::fs::read_to_string(&path).await?;
        Ok(ToolOutput::text(content))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio_util::sync::CancellationToken;
    use wisp_approval::ApprovalGate;
    use wisp_tools_api::Injector;
    use wisp_wire::new_wire;

    use super::*;

    #[tokio::test]
    async fn reads_file_relative_to_workspace_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        tokio::fs::write(dir.path().join("sample.txt"), "hello world").await.expect("write");

        let pair = new_wire();
        let mut ctx = ToolContext::new(
            dir.path(),
            Arc::new(pair.engine),
            Arc::new(ApprovalGate::new()),
            CancellationToken::new(),
            Injector::new(),
        );

        let tool = ReadFileTool;
        let output = tool
            .execute(serde_json::json!({"file_path": "sample.txt"}), &mut ctx)
            .await
            .expect("execute");
        assert_eq!(output.content.as_model_text(), "hello world");
    }

    #[tokio::test]
    async fn missing_file_surfaces_as_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pair = new_wire();
        let mut ctx = ToolContext::new(
            dir.path(),
            Arc::new(pair.engine),
            Arc::new(ApprovalGate::new()),
            CancellationToken::new(),
            Injector::new(),
        );
        let tool = ReadFileTool;
        let err = tool
            .execute(serde_json::json!({"file_path": "missing.txt"}), &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Io(_)));
    }
}
