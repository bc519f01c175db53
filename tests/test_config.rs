use std::io::Write;
use std::path::PathBuf;

use hearth::config::ServerConfig;
use hearth::files::reader::ReadStrategy;

#[test]
fn test_defaults() {
    let cfg = ServerConfig::default();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.backlog, 50);
    assert_eq!(cfg.name, "hearth");
    assert_eq!(cfg.web_root, PathBuf::from("www"));
    assert_eq!(cfg.max_workers, 500);
    assert_eq!(cfg.read_strategy, ReadStrategy::Buffered);
    assert_eq!(cfg.listen_addr(), "127.0.0.1:8080");
}

#[test]
fn test_load_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "port: 9191\nhost: 0.0.0.0\nname: testsrv\nweb_root: /srv/www\nread_strategy: direct\nmax_file_size: 1024"
    )
    .unwrap();

    let cfg = ServerConfig::load(file.path()).unwrap();
    assert_eq!(cfg.port, 9191);
    assert_eq!(cfg.host, "0.0.0.0");
    assert_eq!(cfg.name, "testsrv");
    assert_eq!(cfg.web_root, PathBuf::from("/srv/www"));
    assert_eq!(cfg.read_strategy, ReadStrategy::Direct);
    assert_eq!(cfg.max_file_size, 1024);
    // Unset keys keep their defaults.
    assert_eq!(cfg.backlog, 50);
    assert_eq!(cfg.max_workers, 500);
}

#[test]
fn test_missing_file_is_an_error() {
    assert!(ServerConfig::load(std::path::Path::new("/nonexistent/hearth.yaml")).is_err());
}

#[test]
fn test_unknown_key_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "prot: 9191").unwrap();
    assert!(ServerConfig::load(file.path()).is_err());
}

#[test]
fn test_invalid_strategy_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "read_strategy: turbo").unwrap();
    assert!(ServerConfig::load(file.path()).is_err());
}
