//! Integration tests for the MCP server: protocol handling and tool calls
//! against a real temporary repository.

mod common;

use std::sync::Arc;

use serde_json::{Value, json};

use common::{FakeEnv, TestRepo, embedded_config};
use gcm::commit::Orchestrator;
use gcm::llm::ProviderOptions;
use gcm::mcp::{Server, ToolHandler};

fn server_for(repo: &TestRepo, env: FakeEnv) -> Server {
    let orchestrator = Orchestrator::new(embedded_config(), Arc::new(env));
    Server::new(ToolHandler::new(
        orchestrator,
        ProviderOptions::default(),
        repo.path().to_path_buf(),
    ))
}

/// Call a tool and return `(is_error, text)`.
async fn call_tool(server: &Server, name: &str, arguments: Value) -> (bool, String) {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 7,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments },
    });
    let response = server
        .handle_line(&request.to_string())
        .await
        .expect("tools/call must be answered");

    assert_eq!(response.id, json!(7));
    assert!(response.error.is_none(), "tool failures are not protocol errors");

    let result = response.result.expect("result present");
    let text = result["content"][0]["text"].as_str().unwrap().to_string();
    (result["isError"].as_bool().unwrap_or(false), text)
}

// ============================================
// Protocol
// ============================================

#[tokio::test]
async fn test_serve_answers_requests_and_skips_notifications() {
    let repo = TestRepo::new();
    let server = server_for(&repo, FakeEnv::new());

    let input = [
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"0"}}}"#,
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "",
        r#"{"jsonrpc":"2.0","id":2,"method":"ping"}"#,
        r#"{"jsonrpc":"2.0","id":3,"method":"tools/list"}"#,
    ]
    .join("\n");

    let mut output = Vec::new();
    server.serve(input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(responses.len(), 3);

    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[0]["result"]["serverInfo"]["name"], "gcm");
    assert_eq!(
        responses[0]["result"]["capabilities"]["tools"]["listChanged"],
        false
    );

    assert_eq!(responses[1]["id"], 2);
    assert_eq!(responses[1]["result"], json!({}));

    let tools = responses[2]["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 5);
    assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
}

#[tokio::test]
async fn test_unknown_method_is_method_not_found() {
    let repo = TestRepo::new();
    let server = server_for(&repo, FakeEnv::new());

    let response = server
        .handle_line(r#"{"jsonrpc":"2.0","id":"x","method":"resources/list"}"#)
        .await
        .unwrap();

    assert_eq!(response.id, json!("x"));
    assert_eq!(response.error.unwrap().code, -32601);
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let repo = TestRepo::new();
    let server = server_for(&repo, FakeEnv::new());

    let response = server.handle_line("{not json").await.unwrap();

    assert_eq!(response.id, Value::Null);
    assert_eq!(response.error.unwrap().code, -32700);
}

#[tokio::test]
async fn test_tools_call_without_name_is_invalid_params() {
    let repo = TestRepo::new();
    let server = server_for(&repo, FakeEnv::new());

    let response = server
        .handle_line(r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{}}"#)
        .await
        .unwrap();

    assert_eq!(response.error.unwrap().code, -32602);
}

#[tokio::test]
async fn test_unknown_tool_is_error_result() {
    let repo = TestRepo::new();
    let server = server_for(&repo, FakeEnv::new());

    let (is_error, text) = call_tool(&server, "push", json!({})).await;

    assert!(is_error);
    assert_eq!(text, "Unknown tool: push");
}

// ============================================
// Read-only tools
// ============================================

#[tokio::test]
async fn test_get_staged_diff_and_files() {
    let repo = TestRepo::new();
    repo.stage_file("README.md", "# gcm\n");
    let server = server_for(&repo, FakeEnv::new());

    let (is_error, diff) = call_tool(&server, "get_staged_diff", json!({})).await;
    assert!(!is_error);
    assert!(diff.contains("+# gcm"));

    let (is_error, files) = call_tool(&server, "get_staged_files", json!({})).await;
    assert!(!is_error);
    assert_eq!(files, "A\tREADME.md");
}

#[tokio::test]
async fn test_read_tools_report_nothing_staged_as_text() {
    let repo = TestRepo::new();
    let server = server_for(&repo, FakeEnv::new());

    let (is_error, diff) = call_tool(&server, "get_staged_diff", json!({})).await;
    assert!(!is_error);
    assert_eq!(
        diff,
        "No staged changes found. Please stage your changes with 'git add' first."
    );

    let (is_error, files) = call_tool(&server, "get_staged_files", json!({})).await;
    assert!(!is_error);
    assert_eq!(files, "No staged files found.");
}

// ============================================
// Commit tools
// ============================================

#[tokio::test]
async fn test_commit_requires_message() {
    let repo = TestRepo::new();
    repo.stage_file("a.txt", "a\n");
    let server = server_for(&repo, FakeEnv::new());

    let (is_error, text) = call_tool(&server, "commit", json!({ "message": "" })).await;

    assert!(is_error);
    assert_eq!(text, "Commit message is required");
    assert_eq!(repo.commit_count(), 0);
}

#[tokio::test]
async fn test_commit_rechecks_staged_changes() {
    let repo = TestRepo::new();
    let server = server_for(&repo, FakeEnv::new());

    let (is_error, text) = call_tool(&server, "commit", json!({ "message": "feat: x" })).await;

    assert!(is_error);
    assert!(text.starts_with("No staged changes found."));
}

#[tokio::test]
async fn test_commit_creates_commit() {
    let repo = TestRepo::new();
    repo.stage_file("a.txt", "a\n");
    let server = server_for(&repo, FakeEnv::new());

    let (is_error, text) = call_tool(
        &server,
        "commit",
        json!({ "message": "feat: :sparkles: add a" }),
    )
    .await;

    assert!(!is_error, "unexpected error: {}", text);
    assert!(text.starts_with("Commit created successfully:\n"));
    assert_eq!(repo.head_message(), "feat: :sparkles: add a");
}

#[tokio::test]
async fn test_generate_with_unknown_provider_is_error_result() {
    let repo = TestRepo::new();
    repo.stage_file("a.txt", "a\n");
    let server = server_for(&repo, FakeEnv::new());

    let (is_error, text) = call_tool(
        &server,
        "generate_commit_message",
        json!({ "provider": "openai" }),
    )
    .await;

    assert!(is_error);
    assert!(text.contains("Unknown provider 'openai'"));
}

#[tokio::test]
async fn test_generate_reports_missing_precondition() {
    let repo = TestRepo::new();
    repo.stage_file("a.txt", "a\n");
    let server = server_for(&repo, FakeEnv::new());

    let (is_error, text) = call_tool(
        &server,
        "generate_commit_message",
        json!({ "provider": "claude" }),
    )
    .await;

    assert!(is_error);
    assert!(text.contains("ANTHROPIC_API_KEY"));
}

#[cfg(unix)]
mod with_mock_tool {
    use super::*;
    use common::{create_mock_script, temp_test_dir};

    #[tokio::test]
    async fn test_generate_commit_message_uses_tool_output() {
        let repo = TestRepo::new();
        repo.stage_file("src/main.rs", "fn main() {}\n");
        let bin = temp_test_dir();
        let script = create_mock_script(
            bin.path(),
            "gemini",
            "printf 'feat: :sparkles: add entry point\\n\\nTotal usage: 42\\n'",
        );
        let server = server_for(&repo, FakeEnv::new().with_executable("gemini", &script));

        let (is_error, text) = call_tool(&server, "generate_commit_message", json!({})).await;

        assert!(!is_error, "unexpected error: {}", text);
        assert_eq!(text, "feat: :sparkles: add entry point");
        assert_eq!(repo.commit_count(), 0);
    }

    #[tokio::test]
    async fn test_generate_and_commit() {
        let repo = TestRepo::new();
        repo.stage_file("src/main.rs", "fn main() {}\n");
        let bin = temp_test_dir();
        let script = create_mock_script(bin.path(), "claude", "echo '● feat: :tada: first commit'");
        let server = server_for(&repo, FakeEnv::new().with_executable("claude", &script));

        let (is_error, text) = call_tool(
            &server,
            "generate_and_commit",
            json!({ "provider": "claudecode", "model": "claude-opus-4" }),
        )
        .await;

        assert!(!is_error, "unexpected error: {}", text);
        assert!(text.starts_with("Commit created with message:\nfeat: :tada: first commit\n\nOutput:\n"));
        assert_eq!(repo.head_message(), "feat: :tada: first commit");
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_generated_message() {
        let repo = TestRepo::new();
        repo.stage_file("a.txt", "a\n");
        let hooks = repo.path().join(".git/hooks");
        std::fs::create_dir_all(&hooks).unwrap();
        create_mock_script(
            &hooks,
            "pre-commit",
            "echo 'hook rejected commit' >&2\nexit 1",
        );
        let bin = temp_test_dir();
        let script = create_mock_script(bin.path(), "copilot", "echo 'fix: :bug: keep me'");
        let server = server_for(&repo, FakeEnv::new().with_executable("copilot", &script));

        let (is_error, text) = call_tool(&server, "generate_and_commit", json!({})).await;

        assert!(is_error);
        assert!(text.contains("fix: :bug: keep me"));
        assert!(text.contains("hook rejected commit"));
        assert_eq!(repo.commit_count(), 0);
    }
}
