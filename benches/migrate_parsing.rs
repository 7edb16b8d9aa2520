//! Benchmarks for legacy buildout reading and configuration parsing.
//!
//! These benchmarks measure parsing `buildout.cfg` files and `odoons.yml`
//! documents with a growing number of addon declarations.

use std::fs;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use odoons::buildout::{self, MergedConfig};
use odoons::config::Config;
use odoons::migrate;

const COMMIT: &str = "0123456789abcdef0123456789abcdef01234567";

/// Generate a buildout file declaring `num_addons` addons, a third of them
/// frozen through `revisions`.
fn generate_buildout(num_addons: usize) -> String {
    let mut content = String::from(
        "[buildout]\nparts = odoo\n\n[odoo]\n\
         version = git https://github.com/odoo/odoo.git odoo 14.0\n\
         options.data_dir = ${buildout:directory}/data\n\
         addons =\n",
    );
    for i in 0..num_addons {
        if i % 5 == 0 {
            content.push_str(&format!("    local vendor/local_{}\n", i));
        } else if i % 4 == 0 {
            content.push_str(&format!(
                "    git https://github.com/OCA/repo{i}.git parts/module_{i} 14.0 group=group_{i}\n"
            ));
        } else {
            content.push_str(&format!(
                "    git https://github.com/OCA/repo{i}.git parts/repo_{i} 14.0\n"
            ));
        }
    }
    content.push_str("revisions =\n");
    for i in (1..num_addons).step_by(3) {
        if i % 5 != 0 && i % 4 != 0 {
            content.push_str(&format!("    parts/repo_{} {}\n", i, COMMIT));
        }
    }
    content
}

/// Generate an `odoons.yml` document declaring `num_addons` addons.
fn generate_config(num_addons: usize) -> String {
    let mut content = String::from(
        "odoons:\n  odoo:\n    path: parts/odoo\n    version: \"14.0\"\n  addons:\n",
    );
    for i in 0..num_addons {
        content.push_str(&format!(
            "    repo_{i}:\n      type: git\n      url: https://github.com/OCA/repo{i}.git\n      path: parts/repo_{i}\n      branch: \"14.0\"\n"
        ));
    }
    content
}

fn bench_buildout_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("buildout_parsing");

    for num_addons in [10, 50, 200] {
        let content = generate_buildout(num_addons);
        group.bench_with_input(
            BenchmarkId::new("parse", num_addons),
            &content,
            |b, content| b.iter(|| buildout::parse(black_box(content))),
        );
    }

    group.finish();
}

fn bench_migration(c: &mut Criterion) {
    let mut group = c.benchmark_group("migration");
    let temp = tempfile::TempDir::new().expect("temp dir");

    for num_addons in [10, 50, 200] {
        let path = temp.path().join(format!("buildout_{}.cfg", num_addons));
        fs::write(&path, generate_buildout(num_addons)).expect("write buildout");

        group.bench_with_input(
            BenchmarkId::new("migrate", num_addons),
            &path,
            |b, path| b.iter(|| migrate::migrate(black_box(path))),
        );

        let files = buildout::hierarchy(&path).expect("valid hierarchy");
        group.bench_with_input(
            BenchmarkId::new("merge", num_addons),
            &files,
            |b, files| b.iter(|| MergedConfig::merge(black_box(files))),
        );
    }

    group.finish();
}

fn bench_config_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_parsing");

    for num_addons in [10, 50, 200] {
        let content = generate_config(num_addons);
        group.bench_with_input(
            BenchmarkId::new("addons", num_addons),
            &content,
            |b, content| b.iter(|| Config::parse(black_box(content))),
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_buildout_parsing,
    bench_migration,
    bench_config_parsing
);
criterion_main!(benches);
