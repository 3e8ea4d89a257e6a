//! Claude-to-OpenCode MCP server conversion.
//!
//! Claude's settings document declares MCP servers under `mcpServers`;
//! OpenCode expects them under `mcp` with a different per-server shape:
//! `stdio` servers become `local` with command and args merged into one
//! argv array, `sse`/`http` servers become `remote` with their url, and
//! server names are sanitized (spaces and slashes to underscores). Entries
//! with a `command` but no recognized `type` are treated as local; entries
//! whose type cannot be determined at all are dropped from the output.
//!
//! Pure document rewrite, no I/O. The installer applies it between source
//! validation and the atomic write when a target declares
//! `transform = "mcp-to-opencode"`.

use serde_json::{json, Map, Value as Json};

/// Convert a Claude MCP config document into OpenCode format.
pub fn mcp_to_opencode(src: &Json) -> Json {
    let mut servers = Map::new();
    if let Some(Json::Object(mcp_servers)) = src.get("mcpServers") {
        for (name, server) in mcp_servers {
            if let Some(converted) = convert_server(server) {
                servers.insert(sanitize_name(name), converted);
            }
        }
    }
    json!({
        "$schema": "https://opencode.ai/config.json",
        "mcp": servers,
    })
}

fn convert_server(server: &Json) -> Option<Json> {
    let mut out = Map::new();
    out.insert("enabled".into(), Json::Bool(true));
    match server.get("type").and_then(Json::as_str) {
        Some("stdio") => {
            out.insert("type".into(), json!("local"));
            out.insert("command".into(), Json::Array(merged_command(server)));
            if let Some(Json::Object(env)) = server.get("env") {
                if !env.is_empty() {
                    out.insert("environment".into(), Json::Object(env.clone()));
                }
            }
        }
        Some("sse") | Some("http") => {
            out.insert("type".into(), json!("remote"));
            let url = server.get("url").and_then(Json::as_str).unwrap_or("");
            out.insert("url".into(), json!(url));
        }
        _ if server.get("command").is_some() => {
            out.insert("type".into(), json!("local"));
            out.insert("command".into(), Json::Array(merged_command(server)));
        }
        _ => return None,
    }
    Some(Json::Object(out))
}

/// `command` plus `args`, flattened into one argv-style array.
fn merged_command(server: &Json) -> Vec<Json> {
    let command = server.get("command").and_then(Json::as_str).unwrap_or("bun");
    let mut argv = vec![json!(command)];
    if let Some(Json::Array(args)) = server.get("args") {
        argv.extend(args.iter().cloned());
    }
    argv
}

fn sanitize_name(name: &str) -> String {
    name.replace([' ', '/'], "_")
}
