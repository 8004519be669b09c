//! Built-in artifact descriptors and server adjustments for a generated
//! NestJS server with an Angular or React client.

pub mod client;
pub mod server;

use crate::artifact::ArtifactDescriptor;
use crate::config::GeneratorConfig;

/// Client descriptors followed by the server ones.
pub fn all_descriptors(config: &GeneratorConfig) -> Vec<ArtifactDescriptor> {
    let mut descriptors = client::descriptors(config);
    descriptors.extend(server::descriptors());
    descriptors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::resolve;
    use crate::config::ClientFramework;

    #[test]
    fn all_descriptors_resolve_without_collisions() {
        let config = GeneratorConfig {
            client_framework: Some(ClientFramework::React),
            ..GeneratorConfig::default()
        }
        .with_entity("order", "order");

        let resolved = resolve(&all_descriptors(&config), &config).unwrap();
        let destinations: Vec<&str> = resolved.iter().map(|r| r.destination.as_str()).collect();
        assert_eq!(
            destinations,
            vec![
                "src/main/webapp/app/entities/order/order.gql.ts",
                "src/main/webapp/app/entities/order/order.reducer.ts",
                "server/src/service/graphql/paginated.object-type.ts",
                "server/src/service/graphql/user.object-type.ts",
                "server/src/web/graphql/pagination-util.ts",
                "server/src/web/graphql/user.resolver.ts",
            ]
        );
    }
}
