//! Integration tests for the command-line interface.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn write_sample(dir: &Path) -> std::path::PathBuf {
    let file = dir.join("saxpy.cu");
    fs::write(
        &file,
        r#"#include <cuda_runtime.h>

__global__ void saxpy(int n, float a, float *x, float *y) {
    int i = blockIdx.x * blockDim.x + threadIdx.x;
    if (i < n) y[i] = a * x[i] + y[i];
}

int main() {
    float *x, *y;
    cudaMalloc(&x, 4096);
    cudaMalloc(&y, 4096);
    saxpy<<<4, 256>>>(1024, 2.0f, x, y);
    cudaDeviceSynchronize();
    cudaFree(x);
    cudaFree(y);
    return 0;
}
"#,
    )
    .unwrap();
    file
}

fn hipport(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "--quiet", "--"])
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn convert_writes_sibling_hip_file() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(dir.path());

    let output = hipport(&["convert", file.to_str().unwrap()]);
    assert!(output.status.success());

    let ported = fs::read_to_string(dir.path().join("saxpy.cu.hip")).unwrap();
    assert!(ported.contains("#include <hip/hip_runtime.h>"));
    assert!(ported.contains("hipMalloc(&x, 4096);"));
    assert!(ported.contains("hipLaunchKernelGGL(saxpy, dim3(4), dim3(256), 0, 0, 1024, 2.0f, x, y);"));
    assert!(!ported.contains("cuda"));

    // The input is untouched.
    let input = fs::read_to_string(&file).unwrap();
    assert!(input.contains("cudaMalloc"));
}

#[test]
fn convert_in_place_overwrites_input() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(dir.path());

    let output = hipport(&["convert", "--in-place", file.to_str().unwrap()]);
    assert!(output.status.success());

    let content = fs::read_to_string(&file).unwrap();
    assert!(content.contains("hipDeviceSynchronize();"));
    assert!(!content.contains("cudaDeviceSynchronize"));
    assert!(!dir.path().join("saxpy.cu.hip").exists());
}

#[test]
fn convert_into_output_directory() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(dir.path());
    let out_dir = dir.path().join("ported");

    let output = hipport(&[
        "convert",
        file.to_str().unwrap(),
        "-o",
        out_dir.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let ported = fs::read_to_string(out_dir.join("saxpy.cu")).unwrap();
    assert!(ported.contains("hipMalloc"));
}

#[test]
fn convert_walks_directories() {
    let dir = TempDir::new().unwrap();
    write_sample(dir.path());
    fs::write(dir.path().join("notes.txt"), "cudaMalloc is not code").unwrap();

    let output = hipport(&["convert", dir.path().to_str().unwrap()]);
    assert!(output.status.success());

    assert!(dir.path().join("saxpy.cu.hip").exists());
    assert!(!dir.path().join("notes.txt.hip").exists());
}

#[test]
fn check_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    let file = write_sample(dir.path());

    let output = hipport(&["check", file.to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("would change"));
    assert!(!dir.path().join("saxpy.cu.hip").exists());
    let input = fs::read_to_string(&file).unwrap();
    assert!(input.contains("cudaMalloc"));
}

#[test]
fn unsupported_identifier_prints_warning() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("graphs.cu");
    fs::write(&file, "void run(cudaGraph_t g) {}\n").unwrap();

    let output = hipport(&["check", file.to_str().unwrap()]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cudaGraph_t"));
    assert!(stderr.contains("unsupported"));
}

#[test]
fn extra_rules_extend_the_tables() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("custom.cu");
    fs::write(&file, "myVendorAlloc(&p, n);\n").unwrap();

    let rules = dir.path().join("rules.toml");
    fs::write(
        &rules,
        r#"
[[rules]]
cuda = "myVendorAlloc"
hip = "hipVendorAlloc"
"#,
    )
    .unwrap();

    let output = hipport(&[
        "convert",
        file.to_str().unwrap(),
        "--extra-rules",
        rules.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let ported = fs::read_to_string(dir.path().join("custom.cu.hip")).unwrap();
    assert!(ported.contains("hipVendorAlloc(&p, n);"));
}

#[test]
fn rules_command_lists_table() {
    let output = hipport(&["rules", "cudaMalloc"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("cudaMalloc"));
    assert!(stdout.contains("hipMalloc"));
}
