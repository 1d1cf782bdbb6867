#![allow(dead_code)]

use extguard_api::{Coordinate, ResolvedDependency};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

pub const DEPLOYMENT_MARKER: &str = "META-INF/quarkus-build-steps.list";
pub const EXTENSION_MARKER: &str = "META-INF/quarkus-extension.properties";

/// Write a jar holding `entries` plus a class file so it is never empty.
pub fn write_jar(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.start_file("com/example/Placeholder.class", options).unwrap();
    zip.write_all(b"\xCA\xFE\xBA\xBE").unwrap();
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

fn jar_path(dir: &Path, coordinate: &str) -> PathBuf {
    dir.join(format!("{}.jar", coordinate.replace(':', "_")))
}

fn resolved(coordinate: &str, file: PathBuf) -> ResolvedDependency {
    ResolvedDependency::new(coordinate.parse::<Coordinate>().unwrap(), file)
}

pub fn plain_jar(dir: &Path, coordinate: &str) -> ResolvedDependency {
    let path = jar_path(dir, coordinate);
    write_jar(&path, &[]);
    resolved(coordinate, path)
}

/// A runtime extension archive whose marker names `deployment`.
pub fn extension_jar(dir: &Path, coordinate: &str, deployment: &str) -> ResolvedDependency {
    let path = jar_path(dir, coordinate);
    let content = format!("deployment-artifact={}\n", deployment.replace(':', "\\:"));
    write_jar(&path, &[(EXTENSION_MARKER, &content)]);
    resolved(coordinate, path)
}

pub fn deployment_jar(dir: &Path, coordinate: &str) -> ResolvedDependency {
    let path = jar_path(dir, coordinate);
    write_jar(&path, &[(DEPLOYMENT_MARKER, "io.acme.FooProcessor\n")]);
    resolved(coordinate, path)
}
