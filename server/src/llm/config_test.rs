use std::sync::{Mutex, MutexGuard};

use super::*;

/// Serializes tests that mutate the process environment.
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn env_guard() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// # Safety
/// Callers must hold [`env_guard`].
unsafe fn clear_llm_env() {
    unsafe {
        for key in [
            "LLM_PROVIDER",
            "LLM_MODEL",
            "LLM_API_KEY_ENV",
            "LLM_REQUEST_TIMEOUT_SECS",
            "LLM_CONNECT_TIMEOUT_SECS",
            "GEMINI_API_KEY",
            "ANTHROPIC_API_KEY",
            "TEST_KEY",
        ] {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn from_env_defaults_to_gemini() {
    let _env = env_guard();
    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_API_KEY_ENV", "TEST_KEY");
        std::env::set_var("TEST_KEY", "secret");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::Gemini);
    assert_eq!(cfg.model, "gemini-2.5-flash");
    assert_eq!(cfg.api_key, "secret");
    assert_eq!(
        cfg.timeouts,
        LlmTimeouts { request_secs: DEFAULT_LLM_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_LLM_CONNECT_TIMEOUT_SECS }
    );

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_parses_anthropic_overrides() {
    let _env = env_guard();
    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_PROVIDER", "anthropic");
        std::env::set_var("LLM_API_KEY_ENV", "ANTHROPIC_API_KEY");
        std::env::set_var("ANTHROPIC_API_KEY", "sk-ant");
        std::env::set_var("LLM_MODEL", "claude-haiku-4-5");
        std::env::set_var("LLM_REQUEST_TIMEOUT_SECS", "42");
        std::env::set_var("LLM_CONNECT_TIMEOUT_SECS", "7");
    }

    let cfg = LlmConfig::from_env().unwrap();
    assert_eq!(cfg.provider, LlmProviderKind::Anthropic);
    assert_eq!(cfg.model, "claude-haiku-4-5");
    assert_eq!(cfg.timeouts, LlmTimeouts { request_secs: 42, connect_secs: 7 });

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_unknown_provider_errors() {
    let _env = env_guard();
    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_PROVIDER", "openai");
        std::env::set_var("LLM_API_KEY_ENV", "TEST_KEY");
        std::env::set_var("TEST_KEY", "secret");
    }

    let err = LlmConfig::from_env().unwrap_err().to_string();
    assert!(err.contains("unknown LLM_PROVIDER: openai"));

    unsafe { clear_llm_env() };
}

#[test]
fn from_env_missing_key_var_names_it() {
    let _env = env_guard();
    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_API_KEY_ENV", "GEMINI_API_KEY");
    }

    let err = LlmConfig::from_env().unwrap_err();
    assert!(matches!(err, LlmError::MissingApiKey { ref var } if var == "GEMINI_API_KEY"));

    unsafe { clear_llm_env() };
}

#[test]
fn bad_timeout_falls_back_to_default() {
    let _env = env_guard();
    unsafe {
        clear_llm_env();
        std::env::set_var("LLM_REQUEST_TIMEOUT_SECS", "soon");
    }
    assert_eq!(env_parse_u64("LLM_REQUEST_TIMEOUT_SECS", 9), 9);
    unsafe { clear_llm_env() };
}

#[test]
fn parse_provider_trims_whitespace() {
    assert_eq!(parse_provider(Some(" anthropic ")).unwrap(), LlmProviderKind::Anthropic);
    assert_eq!(parse_provider(None).unwrap(), LlmProviderKind::Gemini);
}
