use crate::artifact::{Activation, ArtifactDescriptor};
use crate::config::{ClientFramework, GeneratorConfig, TypeDefinition};

const ENTITY_DIR: &str = "{{trimslash client_base_dir}}/entities/{{entity_folder_name}}";

fn entity_destination(suffix: &str) -> String {
    format!("{ENTITY_DIR}/{{{{entity_file_name}}}}{suffix}")
}

/// Entity definition in whichever language the configuration selects.
pub fn common_descriptors() -> Vec<ArtifactDescriptor> {
    vec![
        ArtifactDescriptor::new("common/entities/entity.graphql", &entity_destination(".graphql"))
            .when(Activation::TypeDefinition(TypeDefinition::Graphql)),
        ArtifactDescriptor::new("common/entities/entity.gql.ts", &entity_destination(".gql.ts"))
            .when(Activation::TypeDefinition(TypeDefinition::Typescript)),
    ]
}

pub fn angular_descriptors() -> Vec<ArtifactDescriptor> {
    vec![ArtifactDescriptor::new(
        "angular/entities/entity-management.service.ts",
        &entity_destination(".service.ts"),
    )
    .when(Activation::ClientFramework(ClientFramework::Angular))]
}

pub fn react_descriptors() -> Vec<ArtifactDescriptor> {
    vec![ArtifactDescriptor::new(
        "react/entities/entity.reducer.ts",
        &entity_destination(".reducer.ts"),
    )
    .when(Activation::ClientFramework(ClientFramework::React))]
}

/// Common descriptors plus the additions for the configured client framework.
pub fn descriptors(config: &GeneratorConfig) -> Vec<ArtifactDescriptor> {
    let mut descriptors = common_descriptors();
    if config.is_angular() {
        descriptors.extend(angular_descriptors());
    }
    if config.is_react() {
        descriptors.extend(react_descriptors());
    }
    descriptors
}
