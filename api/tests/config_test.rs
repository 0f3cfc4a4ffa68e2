//! Startup refuses an invalid environment

use std::process::Command;

fn clinic_gate() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_clinic-gate"));
    // Outside the workspace so no `.env` file is picked up
    command.env_clear().current_dir(std::env::temp_dir());
    command
}

#[test]
fn test_missing_url_and_short_secret_exit_non_zero() {
    let output = clinic_gate()
        .env("PROVIDER_SERVICE_KEY", "service-role-key-value")
        .env("FRONTEND_URL", "https://clinic.example.org")
        .env("JWT_SECRET", "0123456789")
        .output()
        .expect("failed to run clinic-gate");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("2 violation(s)"), "{}", stderr);
    assert!(stderr.contains("PROVIDER_URL"), "{}", stderr);
    assert!(stderr.contains("JWT_SECRET"), "{}", stderr);
    assert!(!stderr.contains("0123456789"), "{}", stderr);
    assert!(!stderr.contains("service-role-key-value"), "{}", stderr);
}

#[test]
fn test_empty_environment_names_every_required_key() {
    let output = clinic_gate().output().expect("failed to run clinic-gate");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    for key in ["PROVIDER_URL", "PROVIDER_SERVICE_KEY", "FRONTEND_URL", "JWT_SECRET"] {
        assert!(stderr.contains(key), "missing {} in {}", key, stderr);
    }
}
