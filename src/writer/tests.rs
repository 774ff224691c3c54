#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::descriptor::{DuplicatePolicy, Field, PresentationTable, TypeDescriptor, TypeExpr, TypeRegistry};
use crate::package::ServicePackage;
use crate::structures::{
    Argument, Client, ExceptionsClass, Method, Paginator, ServiceModuleName, ServiceName,
    ServiceResource, Waiter,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn full_package() -> ServicePackage {
    let registry = TypeRegistry::from_descriptors(
        "s3",
        DuplicatePolicy::Strict,
        [
            TypeDescriptor::new(
                "GetObjectOutputTypeDef",
                [
                    Field::new("Body", TypeExpr::builtin("bytes"), true),
                    Field::new("Owner", TypeExpr::reference("OwnerTypeDef"), false),
                ],
            ),
            TypeDescriptor::new(
                "OwnerTypeDef",
                [
                    Field::new("ID", TypeExpr::builtin("str"), true),
                    Field::new("from", TypeExpr::builtin("str"), false),
                ],
            ),
        ],
    )
    .unwrap();
    let client = Client::new("S3Client", "Client")
        .with_exceptions_class(ExceptionsClass::default().with_exception("NoSuchKey"))
        .with_method(
            Method::new("get_object", TypeExpr::reference("GetObjectOutputTypeDef"))
                .with_argument(Argument::new("Bucket", TypeExpr::builtin("str"), true)),
        );
    let mut package = ServicePackage::new(
        "stubs_s3",
        "stubs-s3",
        ServiceName::new("s3", "S3", "stubs_s3"),
        client,
        registry,
    )
    .with_version("1.0.0")
    .with_service_resource(ServiceResource::new("S3ServiceResource", "ServiceResource"))
    .with_paginators([Paginator::new("ListObjectsPaginator", "list_objects")])
    .with_waiters([Waiter::new("BucketExistsWaiter", "bucket_exists")]);
    package.flatten_types().unwrap();
    package
}

fn client_only_package() -> ServicePackage {
    ServicePackage::new(
        "stubs_sqs",
        "stubs-sqs",
        ServiceName::new("sqs", "SQS", "stubs_sqs"),
        Client::new("SQSClient", "Client"),
        TypeRegistry::new("sqs", DuplicatePolicy::Strict),
    )
}

/// Renders the template path, so tests can see which template produced a file
struct PathRenderer;

impl Renderer for PathRenderer {
    fn render(&self, template: ServiceTemplate, _package: &ServicePackage) -> anyhow::Result<String> {
        Ok(format!("{template}\n"))
    }
}

struct FailingRenderer(ServiceTemplate);

impl Renderer for FailingRenderer {
    fn render(&self, template: ServiceTemplate, _package: &ServicePackage) -> anyhow::Result<String> {
        if template == self.0 {
            anyhow::bail!("cannot render {template}");
        }
        Ok("ok\n".to_string())
    }
}

fn render(template: ServiceTemplate, package: &ServicePackage) -> String {
    TemplateRenderer.render(template, package).unwrap()
}

#[test]
fn test_template_paths() {
    assert_eq!(ServiceTemplate::Setup.path(), "service/setup.py.jinja2");
    assert_eq!(ServiceTemplate::Init.path(), "service/service/__init__.pyi.jinja2");
    assert_eq!(
        ServiceTemplate::Module(ServiceModuleName::DataclassDefs).path(),
        "service/service/dataclass_defs.pyi.jinja2"
    );
}

#[test]
fn test_plan_full_package_with_setup() {
    let package = full_package();
    let plan = plan_service_package(&package, Path::new("out"), true);
    assert_eq!(plan.len(), 18);
    assert_eq!(plan[0].path, Path::new("out/stubs_s3_package/setup.py"));
    assert_eq!(
        plan[2].path,
        Path::new("out/stubs_s3_package/stubs_s3/version.py")
    );
    let last = plan.last().unwrap();
    assert_eq!(
        last.path,
        Path::new("out/stubs_s3_package/stubs_s3/dataclass_defs.py")
    );
    assert_eq!(
        last.template,
        ServiceTemplate::Module(ServiceModuleName::DataclassDefs)
    );
}

#[test]
fn test_plan_without_setup_writes_into_output() {
    let package = full_package();
    let plan = plan_service_package(&package, Path::new("out"), false);
    assert_eq!(plan.len(), 16);
    assert_eq!(plan[0].path, Path::new("out/stubs_s3/version.py"));
}

#[test]
fn test_plan_skips_absent_components() {
    let plan = plan_service_package(&client_only_package(), Path::new("out"), false);
    let names: Vec<String> = plan
        .iter()
        .map(|p| p.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "version.py",
            "__init__.pyi",
            "__init__.py",
            "__main__.py",
            "py.typed",
            "client.pyi",
            "client.py",
        ]
    );
}

#[test]
fn test_write_only_changed_files() {
    let dir = TempDir::new().unwrap();
    let package = full_package();

    let written =
        write_service_package(&package, dir.path(), true, &PathRenderer, &PassthroughFormatter).unwrap();
    assert_eq!(written.len(), 18);
    let setup = dir.path().join("stubs_s3_package/setup.py");
    assert_eq!(fs::read_to_string(&setup).unwrap(), "service/setup.py.jinja2\n");

    let again =
        write_service_package(&package, dir.path(), true, &PathRenderer, &PassthroughFormatter).unwrap();
    assert!(again.is_empty());

    fs::write(&setup, "edited by hand\n").unwrap();
    let repaired =
        write_service_package(&package, dir.path(), true, &PathRenderer, &PassthroughFormatter).unwrap();
    assert_eq!(repaired, vec![setup]);
}

#[test]
fn test_write_removes_modules_of_dropped_components() {
    let dir = TempDir::new().unwrap();
    let mut package = full_package();
    write_service_package(&package, dir.path(), false, &PathRenderer, &PassthroughFormatter).unwrap();
    let package_dir = dir.path().join("stubs_s3");
    let extra = package_dir.join("notes.txt");
    fs::write(&extra, "kept\n").unwrap();

    package.service_resource = None;
    package.paginators.clear();
    package.waiters.clear();
    let mut stale = stale_files(&package, dir.path(), false);
    stale.sort();
    let expected: Vec<_> = [
        "paginator.py",
        "paginator.pyi",
        "service_resource.py",
        "service_resource.pyi",
        "waiter.py",
        "waiter.pyi",
    ]
    .iter()
    .map(|name| package_dir.join(name))
    .collect();
    assert_eq!(stale, expected);

    write_service_package(&package, dir.path(), false, &PathRenderer, &PassthroughFormatter).unwrap();
    for path in &expected {
        assert!(!path.exists(), "{} should be removed", path.display());
    }
    assert!(package_dir.join("client.pyi").is_file());
    assert!(package_dir.join("type_defs.pyi").is_file());
    assert!(extra.is_file());
    assert!(stale_files(&package, dir.path(), false).is_empty());
}

#[test]
fn test_pending_changes_does_not_write() {
    let dir = TempDir::new().unwrap();
    let package = client_only_package();
    let pending =
        pending_changes(&package, dir.path(), false, &PathRenderer, &PassthroughFormatter).unwrap();
    assert_eq!(pending.len(), 7);
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_render_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let package = full_package();
    let renderer = FailingRenderer(ServiceTemplate::Module(ServiceModuleName::DataclassDefs));
    let err = write_service_package(&package, dir.path(), true, &renderer, &PassthroughFormatter)
        .unwrap_err();
    assert!(err.to_string().contains("cannot render"));
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn test_normalize_text() {
    assert_eq!(normalize_text("a  \nb\t\n\n\n"), "a\nb\n");
    assert_eq!(normalize_text(""), "");
    assert_eq!(normalize_text("partial"), "partial\n");
}

#[test]
fn test_class_view_display() {
    let client = Client::new("S3Client", "Client").with_method(
        Method::new("close", TypeExpr::builtin("None")).with_docstring("Close the connection."),
    );
    let view = ClassView::from_record(&client, &PresentationTable::new())
        .with_attribute("exceptions: Exceptions".to_string());
    assert_eq!(
        view.to_string(),
        "class S3Client(BaseClient):\n    exceptions: Exceptions\n\n    def close(self) -> None:\n        \"\"\"\n        Close the connection.\n        \"\"\""
    );
}

#[test]
fn test_empty_class_view_has_pass() {
    let view = ClassView::from_record(&ExceptionsClass::default(), &PresentationTable::new());
    assert_eq!(view.to_string(), "class Exceptions(BaseClientExceptions):\n    pass");
}

#[test]
fn test_render_client_module() {
    let package = full_package();
    let text = render(ServiceTemplate::Module(ServiceModuleName::Client), &package);
    assert!(text.contains("from stubs_s3 import S3Client"));
    assert!(text.contains("from botocore.client import BaseClient\n"));
    assert!(text.contains("from stubs_s3.type_defs import GetObjectOutputTypeDef\n"));
    assert!(text.contains("class Exceptions(BaseClientExceptions):\n    NoSuchKey: Type[ClientError]"));
    assert!(text.contains("class S3Client(BaseClient):\n    exceptions: Exceptions"));
    assert!(text.contains(
        "def get_object(self, *, Bucket: str) -> GetObjectOutputTypeDef: ..."
    ));
    assert!(text.contains("__all__ = (\n    \"S3Client\",\n)"));
}

#[test]
fn test_render_init_module() {
    let package = full_package();
    let text = render(ServiceTemplate::Init, &package);
    assert!(text.contains("from stubs_s3.client import S3Client\n"));
    assert!(text.contains("Client = S3Client"));
    assert!(text.contains("ServiceResource = S3ServiceResource"));
    assert!(text.contains("    \"BucketExistsWaiter\",\n    \"Client\","));
}

#[test]
fn test_render_type_defs_quotes_forward_refs() {
    let package = full_package();
    let text = render(ServiceTemplate::Module(ServiceModuleName::TypeDefs), &package);
    assert!(text.contains("from typing import TypedDict"));
    assert!(text.contains(
        "_RequiredGetObjectOutputTypeDef = TypedDict(\"_RequiredGetObjectOutputTypeDef\", {\"Body\": bytes})"
    ));
    assert!(text.contains("{\"Owner\": \"OwnerTypeDef\"}, total=False)"));
    assert!(!text.contains("from stubs_s3.type_defs import"));
}

/// `ATypeDef` uses `BTypeDef` before it is defined, `CTypeDef` uses `ATypeDef` after
fn exposed_out_of_order_package() -> ServicePackage {
    let registry = TypeRegistry::from_descriptors(
        "s3",
        DuplicatePolicy::Strict,
        [
            TypeDescriptor::new("ATypeDef", [Field::new("B", TypeExpr::reference("BTypeDef"), true)]),
            TypeDescriptor::new("BTypeDef", [Field::new("Value", TypeExpr::builtin("str"), true)]),
            TypeDescriptor::new("CTypeDef", [Field::new("A", TypeExpr::reference("ATypeDef"), true)]),
        ],
    )
    .unwrap();
    let client = ["ATypeDef", "BTypeDef", "CTypeDef"]
        .into_iter()
        .fold(Client::new("S3Client", "Client"), |client, name| {
            client.with_method(Method::new(
                format!("get_{}", name.to_lowercase()),
                TypeExpr::reference(name),
            ))
        });
    let mut package = ServicePackage::new(
        "stubs_s3",
        "stubs-s3",
        ServiceName::new("s3", "S3", "stubs_s3"),
        client,
        registry,
    );
    package.flatten_types().unwrap();
    package
}

#[test]
fn test_definitions_quote_names_defined_later() {
    let package = exposed_out_of_order_package();
    // every shape is exposed directly, the side-table is left as flattened
    assert!(!package.presentation().is_forward_ref("BTypeDef"));

    let type_defs = render(ServiceTemplate::Module(ServiceModuleName::TypeDefs), &package);
    assert!(type_defs.contains("ATypeDef = TypedDict(\"ATypeDef\", {\"B\": \"BTypeDef\"})"));
    assert!(type_defs.contains("CTypeDef = TypedDict(\"CTypeDef\", {\"A\": ATypeDef})"));

    let dataclasses = render(ServiceTemplate::Module(ServiceModuleName::DataclassDefs), &package);
    assert!(dataclasses.contains("    B: \"BDataClassDef\" = field(metadata=config(field_name=\"B\"))"));
    assert!(dataclasses.contains("    A: ADataClassDef = field(metadata=config(field_name=\"A\"))"));
}

#[cfg(unix)]
#[test]
fn test_command_formatter_handles_output_larger_than_pipe_buffer() {
    let formatter = CommandFormatter::new(vec!["cat".into()], Vec::new());
    let text = "x = 1\n".repeat(200_000);
    let formatted = formatter.format(&text, Path::new("a.py")).unwrap();
    assert_eq!(formatted.len(), text.len());
}

#[test]
fn test_render_dataclass_defs() {
    let package = full_package();
    let text = render(ServiceTemplate::Module(ServiceModuleName::DataclassDefs), &package);
    assert!(text.contains("@dataclass\nclass OwnerDataClassDef(DataClassJsonMixin):"));
    assert!(text.contains("    ID: str = field(metadata=config(field_name=\"ID\"))"));
    assert!(text.contains(
        "    from_: Optional[str] = field(default=None, metadata=config(field_name=\"from\"))"
    ));
    assert!(text.contains("Owner: Optional[\"OwnerDataClassDef\"]"));
}

#[test]
fn test_render_metadata_files() {
    let package = full_package();
    assert!(render(ServiceTemplate::Setup, &package).contains("name=\"stubs-s3\""));
    assert!(render(ServiceTemplate::Version, &package).contains("__version__ = \"1.0.0\""));
    assert!(render(ServiceTemplate::Main, &package).contains("print(\"1.0.0\")"));
    assert!(render(ServiceTemplate::Readme, &package).contains("- `S3ServiceResource`"));
    assert_eq!(render(ServiceTemplate::PyTyped, &package).trim(), "partial");
}

#[test]
fn test_write_with_template_renderer() {
    let dir = TempDir::new().unwrap();
    let package = full_package();
    let written =
        write_service_package(&package, dir.path(), false, &TemplateRenderer, &PassthroughFormatter)
            .unwrap();
    assert_eq!(written.len(), 16);
    let stub = fs::read_to_string(dir.path().join("stubs_s3/client.pyi")).unwrap();
    let module = fs::read_to_string(dir.path().join("stubs_s3/client.py")).unwrap();
    assert_eq!(stub, module);
    assert!(stub.ends_with(")\n") || stub.ends_with("...\n"));
}

#[cfg(unix)]
#[test]
fn test_command_formatter_pipes_python_files() {
    let formatter = CommandFormatter::new(
        vec!["sh".into(), "-c".into(), "tr a-z A-Z".into()],
        vec!["sh".into(), "-c".into(), "cat; echo \"# {module_name}.{extension}\"".into()],
    );
    assert_eq!(
        formatter.format("x = 1  \n", Path::new("client.pyi")).unwrap(),
        "X = 1\n"
    );
    assert_eq!(
        formatter.format("readme  \n", Path::new("README.md")).unwrap(),
        "readme\n"
    );
    assert_eq!(
        formatter.sort_imports("import sys\n", "stubs_s3", "pyi").unwrap(),
        "import sys\n# stubs_s3.pyi\n"
    );
}

#[cfg(unix)]
#[test]
fn test_command_formatter_failure() {
    let formatter = CommandFormatter::new(
        vec!["sh".into(), "-c".into(), "echo boom >&2; exit 3".into()],
        Vec::new(),
    );
    let err = formatter.format("x = 1\n", Path::new("client.py")).unwrap_err();
    assert!(err.to_string().contains("boom"));
    // no sort command configured
    assert_eq!(formatter.sort_imports("a\n", "m", "pyi").unwrap(), "a\n");
}

#[test]
fn test_command_formatter_missing_program() {
    let formatter = CommandFormatter::new(vec!["servicegen-no-such-formatter".into()], Vec::new());
    let err = formatter.format("x\n", Path::new("a.py")).unwrap_err();
    assert!(err.to_string().contains("Failed to start formatter"));
}
