use ean_forge::core::ConfigProvider;
use ean_forge::utils::validation::Validate;
use ean_forge::{ForgeError, RenderFormat, TomlConfig};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_job_file_with_environment_paths() {
    std::env::set_var("EAN_FORGE_IT_OUTPUT", "/var/tmp/ean-forge");
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[job]
name = "nightly"
description = "Codes for the nightly print run"

[generation]
prefix = "590"
count = 100
max_attempts = 2000

[render]
formats = ["ascii"]
ascii_rows = 2
quiet_zone = false

[output]
path = "${{EAN_FORGE_IT_OUTPUT}}/bundles"
"#
    )
    .unwrap();

    let config = TomlConfig::from_file(file.path()).unwrap();
    std::env::remove_var("EAN_FORGE_IT_OUTPUT");

    assert!(config.validate().is_ok());
    assert_eq!(config.output_path(), "/var/tmp/ean-forge/bundles");
    assert_eq!(config.render_formats(), &[RenderFormat::Ascii]);
    assert_eq!(config.count(), 100);
    assert_eq!(config.generator_settings().max_attempts, 2000);
    assert_eq!(config.exclude_file(), None);

    let render = config.render_config();
    assert_eq!(render.ascii_rows, 2);
    assert!(!render.quiet_zone);
}

#[test]
fn test_unresolved_exclusion_path_fails_validation() {
    let config = TomlConfig::from_toml_str(
        r#"
[job]
name = "unresolved"

[generation]
count = 1
exclude_file = "${EAN_FORGE_IT_SURELY_UNSET}/codes.txt"

[output]
path = "./output"
"#,
    )
    .unwrap();

    assert!(matches!(
        config.validate(),
        Err(ForgeError::InvalidConfigValueError { .. })
    ));
}

#[test]
fn test_missing_section_is_reported() {
    let err = TomlConfig::from_toml_str("[job]\nname = \"x\"\n").unwrap_err();
    assert_eq!(err.kind(), "ConfigValidationError");
    assert_eq!(err.exit_code(), 1);
}
