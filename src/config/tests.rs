use std::time::Duration;

use super::*;

#[tokio::test]
async fn test_mock_getters_and_setters() {
    let config = Config::mock(Data::default());

    assert_eq!(config.log_level().await, LogLevel::Warning);
    config.set_log_level(LogLevel::Error).await;
    assert_eq!(config.log_level().await, LogLevel::Error);

    config.set_usize(USizeOpt::Timeout, 3).await;
    assert_eq!(config.usize(USizeOpt::Timeout).await, 3);

    config
        .set_duration(DurationOpt::CacheTtl, Duration::from_secs(42))
        .await;
    assert_eq!(
        config.duration(DurationOpt::CacheTtl).await,
        Duration::from_secs(42)
    );

    config
        .set_path(PathOpt::LogDir, ArcPath::from("/var/log/newsfeed"))
        .await;
    assert_eq!(
        config.path(PathOpt::LogDir).await.to_str(),
        Some("/var/log/newsfeed")
    );

    assert!(config.load().await.is_ok());
    assert!(config.save().await.is_ok());
}

#[tokio::test]
async fn test_load_missing_file_fails_and_keeps_defaults() {
    let config = Config::spawn(Fs::mock(), ArcPath::from("/nowhere/config.toml"));

    assert!(config.load().await.is_err());
    assert_eq!(config.usize(USizeOpt::Timeout).await, 10);
    assert_eq!(
        config.string(StrOpt::BindAddress).await.as_str(),
        "127.0.0.1:8080"
    );
}

#[tokio::test]
async fn test_save_then_load() {
    let fs = Fs::mock();
    let path = ArcPath::from("/home/user/.config/newsfeed/config.toml");

    let writer = Config::spawn(fs.clone(), path.clone());
    writer
        .set_duration(DurationOpt::SweepInterval, Duration::from_secs(15))
        .await;
    writer
        .set_string(StrOpt::BindAddress, ArcStr::from("0.0.0.0:3000"))
        .await;
    writer.save().await.unwrap();

    let reader = Config::spawn(fs, path);
    reader.load().await.unwrap();
    assert_eq!(
        reader.duration(DurationOpt::SweepInterval).await,
        Duration::from_secs(15)
    );
    assert_eq!(
        reader.string(StrOpt::BindAddress).await.as_str(),
        "0.0.0.0:3000"
    );
    assert_eq!(
        reader.duration(DurationOpt::CacheTtl).await,
        Duration::from_secs(300)
    );
}

#[tokio::test]
async fn test_load_invalid_toml() {
    let fs = Fs::mock();
    let path = ArcPath::from("/config.toml");
    fs.write(path.clone(), "cache_ttl = \"soon\"".to_string())
        .await
        .unwrap();

    let config = Config::spawn(fs, path);
    let err = config.load().await.unwrap_err();
    assert!(format!("{:#}", err).contains("Parsing config file"));
}

#[tokio::test]
async fn test_save_on_real_filesystem() {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = ArcPath::from(&temp_dir.path().join("nested").join("config.toml"));

    let config = Config::spawn(Fs::spawn(), path.clone());
    config.set_usize(USizeOpt::MaxAge, 7).await;
    config.save().await.unwrap();

    let contents = tokio::fs::read_to_string(&*path).await.unwrap();
    assert!(contents.contains("max_age = 7"));
}
