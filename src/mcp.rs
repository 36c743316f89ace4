use crate::types::*;
use crate::{models, search, AppState};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, error};

#[derive(Debug, Serialize, Deserialize)]
pub struct McpTool {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpToolsResponse {
    pub tools: Vec<McpTool>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallRequest {
    pub name: String,
    pub arguments: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpCallResponse {
    pub content: Vec<McpContent>,
    pub is_error: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct McpContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl McpCallResponse {
    fn text(text: String, is_error: bool) -> Self {
        Self {
            content: vec![McpContent {
                content_type: "text".to_string(),
                text,
            }],
            is_error,
        }
    }
}

fn required_str<'a>(
    args: &'a serde_json::Value,
    name: &str,
) -> Result<&'a str, (StatusCode, Json<ErrorResponse>)> {
    args.get(name).and_then(|v| v.as_str()).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Missing required parameter: {}", name),
            }),
        )
    })
}

/// Render results as numbered citations for the model prompt.
pub fn format_results(query: &str, response: &SearchResponse) -> String {
    if response.results.is_empty() {
        return format!(
            "No trusted Islamic source was found for '{}'. Do not answer from memory; apologise and suggest consulting a qualified scholar.",
            query
        );
    }
    let mut text = format!(
        "Found {} trusted sources for '{}':\n\n",
        response.results.len(),
        query
    );
    for (i, result) in response.results.iter().enumerate() {
        text.push_str(&format!(
            "{}. **{}**\n   URL: {}\n   Content: {}\n\n",
            i + 1,
            result.title,
            result.url,
            result.content
        ));
    }
    text
}

pub async fn list_tools() -> Json<McpToolsResponse> {
    let tools = vec![
        McpTool {
            name: "search_islamic_sources".to_string(),
            description: "Search the web restricted to trusted Islamic reference sites. Qur'an links are returned with the verse text and its English translation.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query to execute"
                    }
                },
                "required": ["query"]
            }),
        },
        McpTool {
            name: "validate_model".to_string(),
            description: "Check whether a chat model is configured and enabled on this server.".to_string(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {
                    "model": {
                        "type": "string",
                        "description": "Model identifier, e.g. gpt-4o-mini or llama-3-70b"
                    }
                },
                "required": ["model"]
            }),
        },
    ];

    Json(McpToolsResponse { tools })
}

pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    Json(request): Json<McpCallRequest>,
) -> Result<Json<McpCallResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!("MCP tool call: {}", request.name);

    match request.name.as_str() {
        "search_islamic_sources" => {
            let query = required_str(&request.arguments, "query")?;
            match search::perform_search(&state, query).await {
                Ok(response) => Ok(Json(McpCallResponse::text(
                    format_results(query, &response),
                    false,
                ))),
                Err(e) => {
                    error!("Search tool error: {}", e);
                    Ok(Json(McpCallResponse::text(e.to_string(), true)))
                }
            }
        }
        "validate_model" => {
            let model = required_str(&request.arguments, "model")?;
            match models::validate_model(state.env.as_ref(), model) {
                Ok(model) => Ok(Json(McpCallResponse::text(
                    format!("Model {} is available.", model),
                    false,
                ))),
                Err(e) => Ok(Json(McpCallResponse::text(e.to_string(), true))),
            }
        }
        _ => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("Unknown tool: {}", request.name),
            }),
        )),
    }
}
