//! Analyze handler: validate → deterministic reading → Claude → merge.
//!
//! Validation rejects before any computation; the deterministic reading
//! completes before the upstream call is issued; the response merges the
//! model's three fields with the reading. Error payloads never carry the
//! reading as if it were approved output.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use kokoro_core::{
    analyze, prompt::build_analysis_prompt, Biorhythm, JournalEntry, RandomPicker, ReadingError,
    SexagenaryCalendar, UserProfile,
};

use kokoro_core::prompt::build_placeholder_prompt;

use crate::claude::{
    parse_diary_messages, parse_placeholders, BridgeError, ClaudeBridge, EntryPlaceholders,
};
use crate::error::ApiError;
use crate::AppState;

/// Completion budget for placeholder suggestions; the texts are short.
const PLACEHOLDER_MAX_TOKENS: u32 = 500;

/// Inbound analyze request. Every top-level field is optional at the serde
/// layer so validation can name exactly what is missing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    /// Client-computed triple. Presence is part of the contract; the server
    /// recomputes from the birth date at its own single instant.
    #[serde(default)]
    pub biorhythm: Option<Biorhythm>,
    #[serde(default)]
    pub entry: Option<JournalEntry>,
}

fn validate(req: &AnalyzeRequest) -> Result<(&UserProfile, &JournalEntry), ApiError> {
    let profile = req
        .user_profile
        .as_ref()
        .filter(|p| !p.birth_date.trim().is_empty())
        .ok_or_else(|| ApiError::Validation("userProfile.birthDate".to_string()))?;
    if req.biorhythm.is_none() {
        return Err(ApiError::Validation("biorhythm".to_string()));
    }
    let entry = req
        .entry
        .as_ref()
        .ok_or_else(|| ApiError::Validation("entry".to_string()))?;
    Ok((profile, entry))
}

/// POST /api/v1/analyze
pub async fn analyze_post(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<Value>, ApiError> {
    let (profile, entry) = validate(&req)?;

    // Single evaluation instant for pillars, biorhythm, and hints alike.
    let now = Utc::now().with_timezone(&state.config.timezone());
    let reading = analyze(profile, entry, now, &SexagenaryCalendar, &RandomPicker).map_err(
        |e| match e {
            ReadingError::InvalidBirthDate(_) => {
                ApiError::Validation("userProfile.birthDate".to_string())
            }
        },
    )?;

    let bridge = ClaudeBridge::from_env()
        .ok_or_else(|| ApiError::Configuration("ANTHROPIC_API_KEY is not set".to_string()))?
        .with_model(&state.config.model)
        .with_max_tokens(state.config.max_tokens)
        .with_timeout(state.config.request_timeout_secs);

    let prompt = build_analysis_prompt(profile, entry, &reading, now);
    tracing::info!(
        target: "kokoro::gateway",
        model = %state.config.model,
        "dispatching diary analysis"
    );

    let raw = bridge.complete(&prompt).await.map_err(|e| match e {
        BridgeError::Api { status, body } => ApiError::Upstream { status, detail: body },
        other => ApiError::Internal(other.to_string()),
    })?;

    let messages =
        parse_diary_messages(&raw).ok_or(ApiError::UpstreamParse { raw: raw.clone() })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "deepMessage": messages.deep_message,
            "innerMessage": messages.inner_message,
            "actionAdvice": messages.action_advice,
            "themeScores": reading.theme_scores,
            "todayHints": reading.today_hints,
            "saju": {
                "birth": reading.birth,
                "today": reading.today,
                "taiun": reading.taiun,
                "note": reading.note,
            },
            "biorhythm": reading.biorhythm,
        }
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholdersRequest {
    /// 朝/昼/夜 token from the UI clock; anything else reads as evening.
    #[serde(default)]
    pub time_of_day: Option<String>,
}

/// POST /api/v1/placeholders
///
/// Suggests example texts for the journal input fields. This route never
/// fails: a missing key, an upstream error, or an unparseable completion all
/// fall back to the fixed default set with `success: true`.
pub async fn placeholders_post(
    State(state): State<AppState>,
    Json(req): Json<PlaceholdersRequest>,
) -> Json<Value> {
    let placeholders = match ClaudeBridge::from_env() {
        Some(bridge) => {
            let bridge = bridge
                .with_model(&state.config.model)
                .with_max_tokens(PLACEHOLDER_MAX_TOKENS)
                .with_timeout(state.config.request_timeout_secs);
            let prompt = build_placeholder_prompt(req.time_of_day.as_deref().unwrap_or(""));
            match bridge.complete(&prompt).await {
                Ok(raw) => parse_placeholders(&raw).unwrap_or_else(EntryPlaceholders::defaults),
                Err(e) => {
                    tracing::warn!(
                        target: "kokoro::gateway",
                        error = %e,
                        "placeholder generation failed, serving defaults"
                    );
                    EntryPlaceholders::defaults()
                }
            }
        }
        None => EntryPlaceholders::defaults(),
    };

    Json(json!({
        "success": true,
        "placeholders": placeholders,
    }))
}

/// GET /api/v1/health
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "app": state.config.app_name,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kokoro_core::EntryKind;

    fn full_request() -> AnalyzeRequest {
        AnalyzeRequest {
            user_profile: Some(UserProfile {
                birth_date: "1990-05-15".to_string(),
                birth_time: None,
                gender: None,
                nickname: None,
            }),
            biorhythm: Some(Biorhythm { p: 10, e: -5, i: 40 }),
            entry: Some(JournalEntry {
                emoji: "😊".to_string(),
                mood: None,
                kind: EntryKind::Past,
                event: "散歩した".to_string(),
                intuition: None,
            }),
        }
    }

    #[test]
    fn test_validation_passes_on_full_request() {
        assert!(validate(&full_request()).is_ok());
    }

    #[test]
    fn test_validation_names_birth_date_first() {
        let mut req = full_request();
        req.user_profile = None;
        req.biorhythm = None;
        let err = validate(&req).unwrap_err();
        assert_eq!(err.to_string(), "userProfile.birthDate is required");
    }

    #[test]
    fn test_validation_rejects_blank_birth_date() {
        let mut req = full_request();
        if let Some(p) = req.user_profile.as_mut() {
            p.birth_date = "  ".to_string();
        }
        let err = validate(&req).unwrap_err();
        assert_eq!(err.to_string(), "userProfile.birthDate is required");
    }

    #[test]
    fn test_validation_requires_biorhythm_and_entry() {
        let mut req = full_request();
        req.biorhythm = None;
        assert_eq!(validate(&req).unwrap_err().to_string(), "biorhythm is required");

        let mut req = full_request();
        req.entry = None;
        assert_eq!(validate(&req).unwrap_err().to_string(), "entry is required");
    }

    /// Scenario C: missing birthDate short-circuits before any computation or
    /// upstream call — validate() alone decides, no bridge is constructed.
    #[test]
    fn test_missing_birth_date_never_reaches_the_bridge() {
        let req = AnalyzeRequest {
            user_profile: None,
            biorhythm: Some(Biorhythm { p: 0, e: 0, i: 0 }),
            entry: full_request().entry,
        };
        assert!(matches!(validate(&req), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_request_deserializes_from_original_wire_shape() {
        let body = json!({
            "userProfile": { "birthDate": "1990-05-15", "birthTime": "07:30" },
            "biorhythm": { "p": 1, "e": 2, "i": 3 },
            "entry": { "emoji": "😊", "mood": "晴れやか", "type": "past", "event": "会議" }
        });
        let req: AnalyzeRequest = serde_json::from_value(body).unwrap();
        let (profile, entry) = validate(&req).unwrap();
        assert_eq!(profile.birth_time.as_deref(), Some("07:30"));
        assert_eq!(entry.kind, EntryKind::Past);
    }
}
