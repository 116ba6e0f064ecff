// SPDX-License-Identifier: LGPL-3.0-or-later OR MPL-2.0
// This file is a part of `glsl-program`.
//
// `glsl-program` is free software: you can redistribute it and/or modify it under the
// terms of either:
//
// * GNU Lesser General Public License as published by the Free Software Foundation, either
//   version 3 of the License, or (at your option) any later version.
// * Mozilla Public License as published by the Mozilla Foundation, version 2.
//
// `glsl-program` is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR
// PURPOSE. See the GNU Lesser General Public License or the Mozilla Public License for more
// details.
//
// You should have received a copy of the GNU Lesser General Public License and the Mozilla
// Public License along with `glsl-program`. If not, see <https://www.gnu.org/licenses/>.

mod common;

use common::{FakeDriver, BROKEN_VERTEX, FRAGMENT, MISMATCHED_FRAGMENT, VERTEX};

use glsl_program::glam::Mat4;
use glsl_program::{ProgramBuilder, ShaderError, ShaderProgram, Stage};

use std::fs;
use std::rc::Rc;

fn build(driver: &Rc<FakeDriver>) -> ShaderProgram<FakeDriver> {
    ShaderProgram::from_sources(driver.clone(), VERTEX, FRAGMENT).unwrap()
}

#[test]
fn valid_pair_links_and_frees_its_stages() {
    let driver = Rc::new(FakeDriver::new());
    let program = build(&driver);

    assert_eq!(driver.live_programs(), 1);
    assert_eq!(driver.live_shaders(), 0);

    program.activate();
    assert_eq!(driver.current_program(), Some(program.handle()));

    program.set_bool("useTexture", true);
    program.set_int("texture1", 0);
    program.set_float("mixValue", 0.2);
    program.set_vec2("ourGB", 0.5, 0.5);
    program.set_vec4("ourColor", 0.5, 1.0, 0.5, 1.0);
    program.set_mat4("model", &Mat4::IDENTITY.to_cols_array());

    assert!(driver.errors().is_empty(), "{:?}", driver.errors());
}

#[test]
fn vertex_syntax_error_names_the_vertex_stage() {
    let driver = Rc::new(FakeDriver::new());
    let err = ShaderProgram::from_sources(driver.clone(), BROKEN_VERTEX, FRAGMENT).unwrap_err();

    match &err {
        ShaderError::Compile { stage, log } => {
            assert_eq!(*stage, Stage::Vertex);
            assert!(log.contains("unexpected end of file"), "{log}");
        }
        other => panic!("expected a compile error, got {other:?}"),
    }

    // The fragment stage is never reached.
    assert_eq!(driver.compiled_sources().len(), 1);
    assert_eq!(driver.live_shaders(), 0);
    assert_eq!(driver.live_programs(), 0);
}

#[test]
fn fragment_syntax_error_also_frees_the_vertex_stage() {
    let driver = Rc::new(FakeDriver::new());
    let err = ShaderProgram::from_sources(driver.clone(), VERTEX, "void main() { }}").unwrap_err();

    assert!(matches!(
        err,
        ShaderError::Compile {
            stage: Stage::Fragment,
            ..
        }
    ));
    assert_eq!(driver.live_shaders(), 0);
    assert_eq!(driver.live_programs(), 0);
    assert!(driver.errors().is_empty(), "{:?}", driver.errors());
}

#[test]
fn mismatched_interface_fails_to_link() {
    let driver = Rc::new(FakeDriver::new());
    let err = ShaderProgram::from_sources(driver.clone(), VERTEX, MISMATCHED_FRAGMENT).unwrap_err();

    match &err {
        ShaderError::Link { log } => assert!(log.contains("normal"), "{log}"),
        other => panic!("expected a link error, got {other:?}"),
    }

    // Neither the stages nor the program outlive a failed link.
    assert_eq!(driver.live_shaders(), 0);
    assert_eq!(driver.live_programs(), 0);
    assert!(driver.errors().is_empty(), "{:?}", driver.errors());
}

#[test]
fn link_log_has_padding_stripped() {
    let driver = Rc::new(FakeDriver::new());
    let err = ShaderProgram::from_sources(driver.clone(), VERTEX, MISMATCHED_FRAGMENT).unwrap_err();

    let log = err.log().unwrap();
    assert!(!log.ends_with('\0'));
    assert!(!log.ends_with('\n'));
}

#[test]
fn info_log_is_capped() {
    let driver = Rc::new(FakeDriver::new());
    let err = ProgramBuilder::new()
        .info_log_limit(8)
        .build_from_sources(driver.clone(), BROKEN_VERTEX, FRAGMENT)
        .unwrap_err();

    assert_eq!(err.log().unwrap().len(), 8);
}

#[test]
fn unknown_uniforms_are_ignored() {
    let driver = Rc::new(FakeDriver::new());
    let program = build(&driver);
    program.activate();

    program.set_bool("nope", true);
    program.set_int("nope", 1);
    program.set_float("nope", 1.0);
    program.set_vec2("nope", 1.0, 2.0);
    program.set_vec3("nope", 1.0, 2.0, 3.0);
    program.set_vec4("nope", 1.0, 2.0, 3.0, 4.0);
    program.set_mat4("nope", &[0.0; 16]);

    assert!(program.uniform_location("nope").is_none());
    assert!(driver.errors().is_empty(), "{:?}", driver.errors());

    let mut out = [42.0; 4];
    assert!(!program.read_uniform_f32("nope", &mut out));
    assert_eq!(out, [42.0; 4]);
}

#[test]
fn identity_matrix_round_trips() {
    let driver = Rc::new(FakeDriver::new());
    let program = build(&driver);
    let identity = Mat4::IDENTITY.to_cols_array();

    program.activate();
    program.set_mat4("model", &identity);

    let mut out = [0.0; 16];
    assert!(program.read_uniform_f32("model", &mut out));
    assert_eq!(out, identity);
}

#[test]
fn column_major_order_is_preserved() {
    let driver = Rc::new(FakeDriver::new());
    let program = build(&driver);
    let translate = Mat4::from_translation([1.0, 2.0, 3.0].into()).to_cols_array();

    program.activate();
    program.set_mat4("view", &translate);

    let mut out = [0.0; 16];
    program.read_uniform_f32("view", &mut out);
    // The translation lives in the fourth column.
    assert_eq!([out[12], out[13], out[14]], [1.0, 2.0, 3.0]);
}

#[test]
fn color_uniform_round_trips() {
    let driver = Rc::new(FakeDriver::new());
    let program = build(&driver);

    program.activate();
    program.set_vec4("ourColor", 0.5, 1.0, 0.5, 1.0);

    let mut color = [0.0; 4];
    assert!(program.read_uniform_f32("ourColor", &mut color));
    assert_eq!(color, [0.5, 1.0, 0.5, 1.0]);
}

#[test]
fn ints_and_bools_round_trip() {
    let driver = Rc::new(FakeDriver::new());
    let program = build(&driver);

    program.activate();
    program.set_int("texture1", 1);
    program.set_bool("useTexture", true);

    let mut unit = [0];
    let mut flag = [0];
    assert!(program.read_uniform_i32("texture1", &mut unit));
    assert!(program.read_uniform_i32("useTexture", &mut flag));
    assert_eq!((unit, flag), ([1], [1]));

    program.set_bool("useTexture", false);
    program.read_uniform_i32("useTexture", &mut flag);
    assert_eq!(flag, [0]);
}

#[test]
fn setting_without_activation_hits_the_wrong_program() {
    let driver = Rc::new(FakeDriver::new());
    let first = build(&driver);
    let second = build(&driver);

    second.activate();
    first.set_float("mixValue", 1.0);

    assert_eq!(driver.errors().len(), 1);
}

#[test]
fn drop_deletes_the_program() {
    let driver = Rc::new(FakeDriver::new());
    let program = build(&driver);
    program.activate();
    assert_eq!(driver.live_programs(), 1);

    drop(program);
    assert_eq!(driver.live_programs(), 0);
    assert_eq!(driver.current_program(), None);
    assert!(driver.errors().is_empty(), "{:?}", driver.errors());
}

#[test]
fn builds_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let vertex_path = dir.path().join("vshader.vs");
    let fragment_path = dir.path().join("fshader.fs");
    fs::write(&vertex_path, VERTEX).unwrap();
    fs::write(&fragment_path, FRAGMENT).unwrap();

    let driver = Rc::new(FakeDriver::new());
    let program = ShaderProgram::from_files(driver.clone(), &vertex_path, &fragment_path).unwrap();

    program.activate();
    program.set_vec2("ourGB", 0.25, 0.75);

    let mut out = [0.0; 2];
    program.read_uniform_f32("ourGB", &mut out);
    assert_eq!(out, [0.25, 0.75]);

    let sources = driver.compiled_sources();
    assert_eq!(sources[0], (Stage::Vertex, VERTEX.to_owned()));
    assert_eq!(sources[1], (Stage::Fragment, FRAGMENT.to_owned()));
}

#[test]
fn missing_file_never_reaches_the_driver() {
    let dir = tempfile::tempdir().unwrap();
    let vertex_path = dir.path().join("vshader.vs");
    fs::write(&vertex_path, VERTEX).unwrap();
    let missing = dir.path().join("fshader.fs");

    let driver = Rc::new(FakeDriver::new());
    let err = ShaderProgram::from_files(driver.clone(), &vertex_path, &missing).unwrap_err();

    match err {
        ShaderError::FileRead { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected a read error, got {other:?}"),
    }
    assert_eq!(driver.allocations(), 0);
}

#[test]
fn version_header_is_prepended_when_missing() {
    let driver = Rc::new(FakeDriver::new());
    let vertex = VERTEX.trim_start_matches("#version 330 core\n");

    ProgramBuilder::new()
        .version_header("#version 300 es")
        .build_from_sources(driver.clone(), vertex, FRAGMENT)
        .unwrap();

    let sources = driver.compiled_sources();
    assert!(sources[0].1.starts_with("#version 300 es\nlayout"));
    assert!(sources[1].1.starts_with("#version 330 core"));
}

#[test]
fn cached_locations_are_looked_up_once() {
    let driver = Rc::new(FakeDriver::new());
    let program = ProgramBuilder::new()
        .cache_uniform_locations(true)
        .build_from_sources(driver.clone(), VERTEX, FRAGMENT)
        .unwrap();
    program.activate();

    for i in 0..10 {
        program.set_float("mixValue", i as f32);
        program.set_float("missing", i as f32);
    }

    assert_eq!(driver.location_lookups(), 2);

    let mut out = [0.0];
    program.read_uniform_f32("mixValue", &mut out);
    assert_eq!(out, [9.0]);
}

#[test]
fn uncached_locations_are_looked_up_every_time() {
    let driver = Rc::new(FakeDriver::new());
    let program = build(&driver);
    program.activate();

    for i in 0..10 {
        program.set_float("mixValue", i as f32);
    }

    assert_eq!(driver.location_lookups(), 10);
}

#[test]
fn allocation_failure_is_a_backend_error() {
    let driver = Rc::new(FakeDriver::new());
    driver.fail_program_allocation();

    let err = ShaderProgram::from_sources(driver.clone(), VERTEX, FRAGMENT).unwrap_err();

    assert!(matches!(err, ShaderError::Backend(_)));
    assert_eq!(err.to_string(), "graphics backend error");
    assert_eq!(driver.live_shaders(), 0);
}

#[test]
fn borrowed_backend_works() {
    let driver = FakeDriver::new();
    let program = ShaderProgram::from_sources(Rc::new(&driver), VERTEX, FRAGMENT).unwrap();

    program.activate();
    program.set_float("mixValue", 0.5);

    drop(program);
    assert_eq!(driver.live_programs(), 0);
}

fn version_directives(source: &str) -> usize {
    source.matches("#version").count()
}

#[test]
fn leading_comment_keeps_the_sources_own_version() {
    let driver = Rc::new(FakeDriver::new());
    let vertex = format!("// pass-through vertex shader\n{VERTEX}");
    let fragment = format!("/* flat color */\n{FRAGMENT}");

    ProgramBuilder::new()
        .version_header("#version 330 core")
        .build_from_sources(driver.clone(), &vertex, &fragment)
        .unwrap();

    let sources = driver.compiled_sources();
    assert_eq!(sources[0].1, vertex);
    assert_eq!(sources[1].1, fragment);
    assert!(sources.iter().all(|(_, s)| version_directives(s) == 1));
}

#[test]
fn byte_order_mark_is_stripped_before_compiling() {
    let dir = tempfile::tempdir().unwrap();
    let vertex_path = dir.path().join("vshader.vs");
    let fragment_path = dir.path().join("fshader.fs");
    fs::write(&vertex_path, format!("\u{feff}{VERTEX}")).unwrap();
    fs::write(&fragment_path, FRAGMENT).unwrap();

    let driver = Rc::new(FakeDriver::new());
    ProgramBuilder::new()
        .version_header("#version 330 core")
        .build_from_files(driver.clone(), &vertex_path, &fragment_path)
        .unwrap();

    let sources = driver.compiled_sources();
    assert_eq!(sources[0].1, VERTEX);
    assert_eq!(version_directives(&sources[0].1), 1);
}

#[test]
fn zero_log_limit_still_carries_a_log() {
    let driver = Rc::new(FakeDriver::new());

    let compile = ProgramBuilder::new()
        .info_log_limit(0)
        .build_from_sources(driver.clone(), BROKEN_VERTEX, FRAGMENT)
        .unwrap_err();
    assert!(!compile.log().unwrap().is_empty());

    let link = ProgramBuilder::new()
        .info_log_limit(0)
        .build_from_sources(driver.clone(), VERTEX, MISMATCHED_FRAGMENT)
        .unwrap_err();
    assert!(matches!(link, ShaderError::Link { .. }));
    assert!(!link.log().unwrap().is_empty());
}
