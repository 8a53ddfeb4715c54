use hexledger_config::{Config, ConfigError, ConfigManager, WalletMode};
use tempfile::tempdir;

#[test]
fn default_config_has_non_empty_fields() {
    let cfg = Config::default();

    assert_eq!(cfg.currency, "USD");
    assert_eq!(cfg.locale, "en-US");
    assert_eq!(cfg.network, "Ethereum Sepolia Testnet");
    assert_eq!(cfg.wallet.mode, WalletMode::AutoApprove);
    assert!(cfg.recipient.is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let mut cfg = Config::default();
    cfg.application = "ACME LEDGER".to_string();
    cfg.wallet.mode = WalletMode::Reject;
    cfg.recipient = Some("0xdef".to_string());

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded, cfg);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn missing_config_loads_defaults() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    assert_eq!(manager.load().expect("load"), Config::default());
    assert!(manager.backups_dir().is_dir());
}

#[test]
fn partial_files_fill_in_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"currency":"USD","wallet":{"mode":"sideways"}}"#)
        .expect("seed config");
    let manager = ConfigManager::new(path, dir.path().join("backups"));

    let loaded = manager.load().expect("load config");
    assert_eq!(loaded.application, "HEXLEDGER");
    assert_eq!(loaded.explorer_tx_url, "https://sepolia.etherscan.io/tx/");
    assert_eq!(loaded.wallet.mode, WalletMode::AutoApprove);
    assert!(loaded.ui_color_enabled);
}

#[test]
fn config_backups_can_be_listed_and_restored() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.network = "Local Devnet".to_string();
    let name = manager.backup(&cfg, Some("before switch")).expect("backup");
    assert!(name.starts_with("config_"));
    assert!(name.ends_with("_before-switch.json"));

    let backups = manager.list_backups().expect("list");
    assert_eq!(backups.len(), 1);
    assert_eq!(backups[0].name, name);
    assert_eq!(backups[0].note.as_deref(), Some("before-switch"));
    assert!(backups[0].created_at.is_some());

    let restored = manager.restore(&name).expect("restore");
    assert_eq!(restored.network, "Local Devnet");
    assert!(matches!(
        manager.restore("config_missing.json"),
        Err(ConfigError::UnknownBackup(_))
    ));
    assert!(matches!(
        manager.restore("../config.json"),
        Err(ConfigError::UnknownBackup(_))
    ));
}

#[test]
fn backup_creates_a_missing_backups_directory() {
    let dir = tempdir().expect("tempdir");
    let backups_dir = dir.path().join("nested").join("backups");
    let manager = ConfigManager::new(dir.path().join("config.json"), backups_dir.clone());

    let name = manager.backup(&Config::default(), None).expect("backup");
    assert!(backups_dir.join(&name).is_file());
}

#[test]
fn undated_backups_list_last() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");
    std::fs::write(manager.backups_dir().join("config_manual.json"), "{}").expect("seed");
    std::fs::write(manager.backups_dir().join("readme.txt"), "ignored").expect("seed");
    let dated = manager.backup(&Config::default(), Some("dated")).expect("backup");

    let names: Vec<_> = manager
        .list_backups()
        .expect("list")
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    assert_eq!(names, vec![dated, "config_manual.json".to_string()]);
}

#[test]
fn unreadable_config_names_the_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{broken").expect("seed config");
    let manager = ConfigManager::new(path, dir.path().join("backups"));

    match manager.load() {
        Err(ConfigError::Corrupt { path, .. }) => assert!(path.ends_with("config.json")),
        other => panic!("expected corrupt config, got {:?}", other),
    }
}

#[test]
fn directories_default_under_the_base() {
    let base = std::path::Path::new("/tmp/hexledger-home");
    let mut cfg = Config::default();
    assert_eq!(cfg.resolve_data_dir(base), base.join("data"));
    assert_eq!(cfg.resolve_export_dir(base), base.join("exports"));

    cfg.export_dir = Some("/srv/exports".into());
    assert_eq!(cfg.resolve_export_dir(base), std::path::PathBuf::from("/srv/exports"));
    assert_eq!(cfg.explorer_link("0xabc"), "https://sepolia.etherscan.io/tx/0xabc");
}
