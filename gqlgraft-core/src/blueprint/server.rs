use crate::artifact::ArtifactDescriptor;
use crate::config::GeneratorConfig;
use crate::patch::{
    ClassSelector, CollectionSelector, DecoratorSpec, EditOperation, InsertPosition, PatchRoutine,
};

const SERVER_TEMPLATES: [&str; 4] = [
    "src/service/graphql/paginated.object-type.ts",
    "src/service/graphql/user.object-type.ts",
    "src/web/graphql/pagination-util.ts",
    "src/web/graphql/user.resolver.ts",
];

pub const GRAPHQL_MODULE: &str = "@nestjs/graphql";

/// Registration inserted into the `@Module` imports of the application module.
pub const GRAPHQL_MODULE_REGISTRATION: &str = "GraphQLModule.forRoot({
    installSubscriptionHandlers: true,
    autoSchemaFile: join(process.cwd(), 'src/schema.gql'),
    buildSchemaOptions: {
        numberScalarMode: 'integer'
    }
})";

/// GraphQL infrastructure copied verbatim into the server tree.
pub fn descriptors() -> Vec<ArtifactDescriptor> {
    SERVER_TEMPLATES
        .iter()
        .map(|template| {
            ArtifactDescriptor::new(
                &format!("server/{template}"),
                &format!("{{{{trimslash server_base_dir}}}}/{template}"),
            )
        })
        .collect()
}

fn server_path(config: &GeneratorConfig, relative: &str) -> String {
    let base = config.server_base_dir.trim_end_matches('/');
    if base.is_empty() {
        relative.to_string()
    } else {
        format!("{base}/{relative}")
    }
}

fn module_collection(property: &str) -> CollectionSelector {
    CollectionSelector::decorator_property(ClassSelector::Only, "Module", property)
}

pub fn app_module(config: &GeneratorConfig) -> PatchRoutine {
    PatchRoutine::new(&server_path(config, "src/app.module.ts"))
        .import(GRAPHQL_MODULE, "GraphQLModule")
        .import("path", "join")
        .then(EditOperation::insert_element(
            module_collection("imports"),
            GRAPHQL_MODULE_REGISTRATION,
            InsertPosition::BeforeLast,
        ))
}

pub fn user_module(config: &GeneratorConfig) -> PatchRoutine {
    PatchRoutine::new(&server_path(config, "src/module/user.module.ts"))
        .import("../web/graphql/user.resolver", "UserResolver")
        .then(EditOperation::insert_element(
            module_collection("providers"),
            "UserResolver",
            InsertPosition::Append,
        ))
}

pub fn base_dto(config: &GeneratorConfig) -> PatchRoutine {
    PatchRoutine::new(&server_path(config, "src/service/dto/base.dto.ts"))
        .import(GRAPHQL_MODULE, "Field")
        .import(GRAPHQL_MODULE, "InputType")
        .import(GRAPHQL_MODULE, "ObjectType")
        .then(EditOperation::class_decorator(
            ClassSelector::Only,
            DecoratorSpec::new("ObjectType"),
        ))
        .then(EditOperation::class_decorator(
            ClassSelector::Only,
            DecoratorSpec::new("InputType"),
        ))
        .then(EditOperation::member_decorator(
            ClassSelector::Only,
            "id",
            DecoratorSpec::new("Field").with_argument("{nullable: false}"),
        ))
}

pub fn user_dto(config: &GeneratorConfig) -> PatchRoutine {
    PatchRoutine::new(&server_path(config, "src/service/dto/user.dto.ts"))
        .import(GRAPHQL_MODULE, "InputType")
        .import(GRAPHQL_MODULE, "ObjectType")
        .import(GRAPHQL_MODULE, "HideField")
        .then(EditOperation::class_decorator(
            ClassSelector::Only,
            DecoratorSpec::new("ObjectType"),
        ))
        .then(EditOperation::class_decorator(
            ClassSelector::Only,
            DecoratorSpec::new("InputType").with_argument("'_user'"),
        ))
        .then(EditOperation::set_member_type(
            ClassSelector::Only,
            "authorities",
            "string[]",
        ))
        .then(EditOperation::member_decorator(
            ClassSelector::Only,
            "password",
            DecoratorSpec::new("HideField"),
        ))
}

/// In-place adjustments of the generated server, in the order they run.
pub fn adjustments(config: &GeneratorConfig) -> Vec<PatchRoutine> {
    vec![
        app_module(config),
        user_module(config),
        base_dto(config),
        user_dto(config),
    ]
}
