use pomwalk_util::errors::PomwalkError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = PomwalkError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_manifest_error_display() {
    let err = PomwalkError::Manifest {
        message: "no pom.xml".to_string(),
    };
    assert_eq!(err.to_string(), "Manifest error: no pom.xml");
}

#[test]
fn test_resolution_error_display() {
    let err = PomwalkError::Resolution {
        message: "2 manifests stalled".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Dependency resolution failed: 2 manifests stalled"
    );
}

#[test]
fn test_config_error_display() {
    let err = PomwalkError::Config {
        message: "bad toml".to_string(),
    };
    assert_eq!(err.to_string(), "Configuration error: bad toml");
}

#[test]
fn test_watch_error_display() {
    let err = PomwalkError::Watch {
        message: "inotify limit".to_string(),
    };
    assert_eq!(err.to_string(), "Watch error: inotify limit");
}

#[test]
fn test_generic_error_display() {
    let err = PomwalkError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: PomwalkError = io_err.into();
    assert!(matches!(err, PomwalkError::Io(_)));
}
