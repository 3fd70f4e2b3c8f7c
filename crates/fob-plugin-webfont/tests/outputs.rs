mod common;

use std::collections::BTreeSet;
use std::path::PathBuf;

use common::{FakeGenerator, Project};
use fob_plugin_webfont::config::{Destination, WebfontOptions};
use fob_plugin_webfont::{Compilation, LifecyclePlugin, WebfontError, WebfontPlugin};
use rustc_hash::FxHashSet;
use serde_json::json;

fn build(project: &Project, options: WebfontOptions, generator: FakeGenerator) -> WebfontPlugin<FakeGenerator> {
    WebfontPlugin::builder(options, generator)
        .with_root(project.root())
        .build()
        .unwrap()
}

#[tokio::test]
async fn split_destination_with_styles_dir() {
    let project = Project::new();
    let mut options = project.options().with_template("scss").with_font_name("app-icons");
    options.dest = Some(Destination::Split {
        fonts_dir: PathBuf::from("public/fonts"),
        styles_dir: Some(PathBuf::from("src/styles")),
        css: None,
    });

    let plugin = build(&project, options, FakeGenerator::new());
    plugin.generate().await.unwrap();

    assert!(project.path("public/fonts/app-icons.woff2").is_file());
    assert!(project.path("src/styles/app-icons.scss").is_file());
    assert!(!project.path("public/fonts/app-icons.scss").exists());
}

#[tokio::test]
async fn css_file_destination() {
    let project = Project::new();
    let mut options = project.options();
    options.dest = Some(Destination::Split {
        fonts_dir: PathBuf::from("public/fonts"),
        styles_dir: None,
        css: Some(PathBuf::from("src/icons.css")),
    });

    let plugin = build(&project, options, FakeGenerator::new());
    let summary = plugin.generate().await.unwrap();

    assert!(summary.written.contains(&project.path("src/icons.css")));
    assert!(project.path("public/fonts/webfont.ttf").is_file());
}

#[tokio::test]
async fn dest_template_moves_only_the_stylesheet() {
    let project = Project::new();
    let options = project.options().with_dest_template(project.path("styles"));

    let plugin = build(&project, options, FakeGenerator::new());
    plugin.generate().await.unwrap();

    assert!(project.path("styles/webfont.css").is_file());
    assert!(project.path("dist/fonts/webfont.svg").is_file());
}

#[tokio::test]
async fn custom_template_is_named_after_template_and_tracked() {
    let project = Project::new();
    let template = project.write("templates/icons.css.njk", "/* custom */\n");
    let options = project
        .options()
        .with_template(template.to_string_lossy().into_owned());

    let plugin = build(&project, options, FakeGenerator::new());
    let mut compilation = Compilation::new(false);
    plugin.first_build(&mut compilation).await.unwrap();
    plugin.build_finished(&mut compilation).await.unwrap();

    let css = String::from_utf8(project.read("dist/fonts/icons.css")).unwrap();
    assert!(css.starts_with("/* custom */"));
    assert!(compilation.file_dependencies.contains(&template));
}

#[tokio::test]
async fn external_config_is_merged_and_tracked() {
    let project = Project::new();
    let config = project.write(
        "webfont.config.json",
        &json!({ "fontName": "from-config", "template": "less" }).to_string(),
    );
    let options = project.options().with_config(&config).with_template("scss");

    let plugin = build(&project, options, FakeGenerator::new());
    let mut compilation = Compilation::new(false);
    plugin.first_build(&mut compilation).await.unwrap();
    plugin.build_finished(&mut compilation).await.unwrap();

    assert!(compilation.diagnostics.is_empty());
    assert!(project.path("dist/fonts/from-config.woff").is_file());
    assert!(project.path("dist/fonts/from-config.scss").is_file());
    assert_eq!(
        compilation.file_dependencies.iter().collect::<Vec<_>>(),
        vec![&config]
    );
}

#[tokio::test]
async fn script_config_is_passed_to_the_generator_and_tracked() {
    let project = Project::new();
    let config = project.write(
        "webfont.config.js",
        "module.exports = { fontName: 'from-js' };",
    );
    let options = project.options().with_config("webfont.config.js");

    let plugin = build(&project, options, FakeGenerator::new());
    let mut compilation = Compilation::new(false);
    plugin.first_build(&mut compilation).await.unwrap();
    plugin.build_finished(&mut compilation).await.unwrap();

    assert!(compilation.diagnostics.is_empty());
    assert!(project.path("dist/fonts/webfont.woff2").is_file());
    assert_eq!(
        compilation.file_dependencies.iter().collect::<Vec<_>>(),
        vec![&config]
    );
}

#[tokio::test]
async fn missing_external_config_is_a_build_failure() {
    let project = Project::new();
    let options = project.options().with_config(project.path("missing.json"));
    let plugin = build(&project, options, FakeGenerator::new());

    let err = plugin.generate().await.unwrap_err();
    assert!(matches!(err, WebfontError::ExternalConfig { .. }));

    let mut compilation = Compilation::new(false);
    plugin.first_build(&mut compilation).await.unwrap();
    assert_eq!(compilation.diagnostics.len(), 1);
}

#[tokio::test]
async fn named_font_files_are_flattened_into_font_dir() {
    let project = Project::new();
    let plugin = build(&project, project.options(), FakeGenerator::new().with_named_ttf());

    plugin.generate().await.unwrap();

    assert!(project.path("dist/fonts/webfont-regular.ttf").is_file());
    assert!(project.path("dist/fonts/webfont-bold.ttf").is_file());
    assert!(!project.path("dist/fonts/nested").exists());
    assert!(!project.path("dist/fonts/webfont.ttf").exists());
}

#[tokio::test]
async fn write_failure_follows_bail_policy() {
    let project = Project::new();
    project.write("dist/fonts", "a file where a directory should be");
    let plugin = build(&project, project.options(), FakeGenerator::new());

    let mut compilation = Compilation::new(false);
    plugin.first_build(&mut compilation).await.unwrap();
    assert_eq!(compilation.diagnostics.len(), 1);

    let mut compilation = Compilation::new(true);
    let err = plugin.first_build(&mut compilation).await.unwrap_err();
    assert!(matches!(err, WebfontError::Write { .. }));
}

#[tokio::test]
async fn dependencies_export_into_host_collections() {
    let project = Project::new();
    project.write("more/extra.svg", common::AVATAR);
    let mut options = project.options();
    options.files = vec![
        project.icons_glob(),
        format!("{}/more/*.svg", project.root().display()),
    ]
    .into();

    let plugin = build(&project, options, FakeGenerator::new());
    plugin.generate().await.unwrap();
    plugin.generate().await.unwrap();

    let dependencies = plugin.dependencies();
    let expected = vec![project.path("icons"), project.path("more")];

    let mut files: Vec<PathBuf> = Vec::new();
    let mut contexts: Vec<PathBuf> = Vec::new();
    dependencies.export_to(&mut files, &mut contexts);
    dependencies.export_to(&mut files, &mut contexts);
    assert!(files.is_empty());
    assert_eq!(contexts, expected);

    let mut hashed: FxHashSet<PathBuf> = FxHashSet::default();
    let mut ordered: BTreeSet<PathBuf> = BTreeSet::new();
    dependencies.export_to(&mut hashed, &mut ordered);
    assert!(hashed.is_empty());
    assert_eq!(ordered.into_iter().collect::<Vec<_>>(), expected);
}
