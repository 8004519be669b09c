use gqlgraft::artifact::descriptors_from_yaml;
use gqlgraft::blueprint::{self, client};
use gqlgraft::{
    copy_artifacts, resolve, ClientFramework, GeneratorConfig, ResolveError, TypeDefinition,
};
use std::fs;
use tempfile::TempDir;

fn order_config(type_definition: TypeDefinition, framework: ClientFramework) -> GeneratorConfig {
    GeneratorConfig {
        type_definition,
        client_framework: Some(framework),
        ..GeneratorConfig::default()
    }
    .with_entity("order", "order")
}

#[test]
fn typescript_angular_order_entity() {
    let config = order_config(TypeDefinition::Typescript, ClientFramework::Angular);
    let resolved = resolve(&blueprint::all_descriptors(&config), &config).unwrap();

    let templates: Vec<&str> = resolved.iter().map(|r| r.source_template.as_str()).collect();
    assert!(templates.contains(&"common/entities/entity.gql.ts"));
    assert!(templates.contains(&"angular/entities/entity-management.service.ts"));
    assert!(!templates.contains(&"common/entities/entity.graphql"));
    assert!(!templates.contains(&"react/entities/entity.reducer.ts"));
    assert_eq!(
        resolved[0].destination,
        "src/main/webapp/app/entities/order/order.gql.ts"
    );
}

#[test]
fn graphql_definition_excludes_typescript_descriptor() {
    let config = order_config(TypeDefinition::Graphql, ClientFramework::React);
    let resolved = resolve(&client::common_descriptors(), &config).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].source_template, "common/entities/entity.graphql");
}

#[test]
fn resolution_is_pure() {
    let config = order_config(TypeDefinition::Typescript, ClientFramework::React);
    let descriptors = blueprint::all_descriptors(&config);
    let first = resolve(&descriptors, &config).unwrap();
    let second = resolve(&descriptors, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn missing_entity_name_aborts_resolution() {
    let config = GeneratorConfig {
        client_framework: Some(ClientFramework::Angular),
        ..GeneratorConfig::default()
    };
    let err = resolve(&blueprint::all_descriptors(&config), &config).unwrap_err();
    match err {
        ResolveError::TemplateEvaluation {
            source_template, ..
        } => assert_eq!(source_template, "common/entities/entity.gql.ts"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn colliding_yaml_descriptors_are_rejected() {
    let yaml = r#"
- source_template: a/schema.gql
  destination: "{{server_base_dir}}/src/schema.gql"
- source_template: b/schema.gql
  destination: "{{trimslash server_base_dir}}/src/schema.gql"
"#;
    let descriptors = descriptors_from_yaml(yaml).unwrap();
    let err = resolve(&descriptors, &GeneratorConfig::default()).unwrap_err();
    assert!(matches!(err, ResolveError::DuplicateDestination { .. }));
}

#[test]
fn resolved_templates_are_copied_verbatim() {
    let templates = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let body = "export const ORDER_FIELDS = gql`fragment OrderFields on Order { id }`;\n";
    fs::create_dir_all(templates.path().join("common/entities")).unwrap();
    fs::write(templates.path().join("common/entities/entity.gql.ts"), body).unwrap();

    let config = order_config(TypeDefinition::Typescript, ClientFramework::Vue);
    let resolved = resolve(&client::descriptors(&config), &config).unwrap();
    let written = copy_artifacts(&resolved, templates.path(), output.path()).unwrap();

    assert_eq!(written, 1);
    assert_eq!(
        fs::read_to_string(
            output
                .path()
                .join("src/main/webapp/app/entities/order/order.gql.ts")
        )
        .unwrap(),
        body
    );
}
