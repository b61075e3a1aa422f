//! Coverage for credential loading, permission checks and gateway resolution.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use tasksms::config::GatewayConfig;
use tasksms::credentials::{load_credentials, Credentials, GatewayCredentials};

fn temp_env_path() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tasksms_test_{}", uuid::Uuid::new_v4()));
    let create = fs::create_dir_all(&dir);
    assert!(create.is_ok());
    dir.join(".env")
}

fn map(pairs: &[(&str, &str)]) -> Credentials {
    Credentials::from_map(
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect::<BTreeMap<_, _>>(),
    )
}

#[test]
fn loads_env_credentials() {
    let env_path = temp_env_path();
    let write = fs::write(
        &env_path,
        "GOOGLE_VOICE_EMAIL=me@example.com\nGOOGLE_VOICE_PASSWORD=hunter2\n",
    );
    assert!(write.is_ok());
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::set_permissions(&env_path, fs::Permissions::from_mode(0o600));
        assert!(perms.is_ok());
    }

    let credentials = match load_credentials(&env_path) {
        Ok(credentials) => credentials,
        Err(err) => panic!("credentials should load: {err}"),
    };

    assert_eq!(credentials.get("GOOGLE_VOICE_EMAIL"), Some("me@example.com"));
    assert_eq!(credentials.get("GOOGLE_VOICE_PASSWORD"), Some("hunter2"));
}

#[cfg(unix)]
#[test]
fn rejects_world_readable_env_file() {
    use std::os::unix::fs::PermissionsExt;

    let env_path = temp_env_path();
    let write = fs::write(&env_path, "GOOGLE_VOICE_PASSWORD=hunter2\n");
    assert!(write.is_ok());

    let perms = fs::set_permissions(&env_path, fs::Permissions::from_mode(0o644));
    assert!(perms.is_ok());

    assert!(load_credentials(&env_path).is_err());
}

#[test]
fn missing_env_file_is_an_error() {
    let env_path = temp_env_path();
    assert!(load_credentials(&env_path).is_err());
}

#[test]
fn resolves_gateway_account_from_configured_names() {
    let gateway = GatewayConfig {
        base_url: "http://127.0.0.1:9".to_owned(),
        identity_env: "SMS_ID".to_owned(),
        secret_env: "SMS_SECRET".to_owned(),
    };
    let credentials = map(&[("SMS_ID", "me@example.com"), ("SMS_SECRET", "hunter2")]);

    let account = match GatewayCredentials::resolve(&credentials, &gateway) {
        Ok(account) => account,
        Err(err) => panic!("account should resolve: {err}"),
    };
    assert_eq!(account.identity(), "me@example.com");
    assert_eq!(account.secret(), "hunter2");
    assert!(GatewayCredentials::is_configured(&credentials, &gateway));
}

#[test]
fn missing_or_blank_secret_is_a_configuration_error() {
    let gateway = GatewayConfig::default();

    let missing = map(&[("GOOGLE_VOICE_EMAIL", "me@example.com")]);
    let err = match GatewayCredentials::resolve(&missing, &gateway) {
        Ok(_) => panic!("resolution should fail without a secret"),
        Err(err) => err,
    };
    assert!(format!("{err:#}").contains("GOOGLE_VOICE_PASSWORD"));

    let blank = map(&[
        ("GOOGLE_VOICE_EMAIL", "me@example.com"),
        ("GOOGLE_VOICE_PASSWORD", "   "),
    ]);
    assert!(!GatewayCredentials::is_configured(&blank, &gateway));
}

#[test]
fn merge_prefers_later_source() {
    let file = map(&[("A", "from-file"), ("B", "only-file")]);
    let env = map(&[("A", "from-env")]);
    let merged = file.merge(env);
    assert_eq!(merged.get("A"), Some("from-env"));
    assert_eq!(merged.get("B"), Some("only-file"));
}

#[test]
fn debug_output_redacts_values() {
    let credentials = map(&[("GOOGLE_VOICE_PASSWORD", "hunter2")]);
    let account = GatewayCredentials::new("me@example.com", "hunter2");

    assert!(!format!("{credentials:?}").contains("hunter2"));
    assert!(!format!("{account:?}").contains("hunter2"));
    assert!(format!("{account:?}").contains("me@example.com"));
}
