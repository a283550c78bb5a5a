use proptest::prelude::*;
use std::fs;
use tempfile::TempDir;

use ci_bootstrap::models::connection_parameters::ConnectionParameters;
use ci_bootstrap::services::parameters_renderer::ParametersRenderer;

fn lookup(values: [&'static str; 4]) -> impl Fn(&str) -> Option<String> {
    move |name| {
        let value = match name {
            "ACCOUNT" => values[0],
            "USER" => values[1],
            "PASSWORD" => values[2],
            "SCHEMA" => values[3],
            _ => return None,
        };
        Some(value.to_string())
    }
}

fn keys_of(contents: &str) -> Vec<String> {
    contents
        .lines()
        .filter(|line| line.starts_with("    '"))
        .map(|line| line.trim_start().split('\'').nth(1).unwrap_or_default().to_string())
        .collect()
}

proptest! {
    #[test]
    fn render_has_five_keys_for_any_values(
        account in any::<String>(),
        user in any::<String>(),
        password in any::<String>(),
        schema in any::<String>(),
    ) {
        let params = ConnectionParameters::from_lookup(move |name| match name {
            "ACCOUNT" => Some(account.clone()),
            "USER" => Some(user.clone()),
            "PASSWORD" => Some(password.clone()),
            "SCHEMA" => Some(schema.clone()),
            _ => None,
        });
        let contents = ParametersRenderer::new().render(&params);

        prop_assert_eq!(
            keys_of(&contents),
            vec!["account", "user", "password", "schema", "database"]
        );
        prop_assert!(contents.contains("    'database': 'testdb',\n"));
    }
}

#[test]
fn test_quotes_cannot_break_out_of_the_literal() {
    let params = ConnectionParameters::from_lookup(lookup(["x', 'injected': 'y", "ci", "", ""]));
    let contents = ParametersRenderer::new().render(&params);

    assert!(contents.contains(r"    'account': 'x\', \'injected\': \'y',"));
    assert_eq!(keys_of(&contents).len(), 5);
}

#[test]
fn test_successive_writes_are_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test").join("parameters.py");
    let renderer = ParametersRenderer::new();
    let params = ConnectionParameters::from_lookup(lookup(["acme", "ci", "secret", "public"]));

    renderer.write(&params, &path).unwrap();
    let first = fs::read(&path).unwrap();

    renderer.write(&params, &path).unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, renderer.render(&params).into_bytes());
}

#[test]
fn test_no_temporary_files_left_behind() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("parameters.py");
    let params = ConnectionParameters::from_lookup(lookup(["acme", "ci", "secret", "public"]));

    ParametersRenderer::new().write(&params, &path).unwrap();

    let entries: Vec<_> = fs::read_dir(temp_dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}
