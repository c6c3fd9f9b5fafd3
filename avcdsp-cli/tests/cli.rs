use std::path::PathBuf;
use std::process::{Command, Output};

const SAMPLE: [u8; 16] = [58, 64, 51, 58, 52, 64, 56, 66, 62, 63, 61, 64, 59, 51, 63, 69];

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("avcdsp_cli_{}_{}", std::process::id(), name))
}

fn avcdsp(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_avcdsp"))
        .args(args)
        .output()
        .expect("failed to run avcdsp")
}

fn decode_i32(bytes: &[u8]) -> Vec<i32> {
    bytes
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[test]
fn forward_then_inverse_through_files() {
    let input = temp_path("fwd_in.yuv");
    let coeffs = temp_path("fwd.coef");
    let residual = temp_path("inv.res");
    std::fs::write(&input, SAMPLE).unwrap();

    let out = avcdsp(&[
        "forward",
        "-i",
        input.to_str().unwrap(),
        "-o",
        coeffs.to_str().unwrap(),
        "--width",
        "4",
        "--height",
        "4",
        "--qp",
        "28",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let levels = decode_i32(&std::fs::read(&coeffs).unwrap());
    let mut expected = vec![0; 16];
    expected[0] = 15;
    assert_eq!(levels, expected);

    let out = avcdsp(&[
        "inverse",
        "-i",
        coeffs.to_str().unwrap(),
        "-o",
        residual.to_str().unwrap(),
        "--width",
        "4",
        "--height",
        "4",
        "--qp",
        "28",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(decode_i32(&std::fs::read(&residual).unwrap()), vec![60; 16]);

    for path in [input, coeffs, residual] {
        let _ = std::fs::remove_file(path);
    }
}

#[test]
fn qpel_from_y4m_uses_header_dimensions() {
    let input = temp_path("flat.y4m");
    let output = temp_path("flat.qpel");
    let mut y4m = b"YUV4MPEG2 W4 H4 F30:1 Ip A1:1 C420jpeg\nFRAME\n".to_vec();
    y4m.extend_from_slice(&[77u8; 16]);
    y4m.extend_from_slice(&[128u8; 8]);
    std::fs::write(&input, &y4m).unwrap();

    let out = avcdsp(&[
        "qpel",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let samples = std::fs::read(&output).unwrap();
    assert_eq!(samples.len(), 48 * 48);
    assert!(samples.iter().all(|&s| s == 77));

    let _ = std::fs::remove_file(input);
    let _ = std::fs::remove_file(output);
}

#[test]
fn rejects_out_of_range_qp() {
    let out = avcdsp(&[
        "forward", "-i", "unused", "-o", "unused", "--width", "4", "--height", "4", "--qp", "52",
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("0..=51"));
}

#[test]
fn raw_input_needs_dimensions() {
    let input = temp_path("nodims.yuv");
    let output = temp_path("nodims.qpel");
    std::fs::write(&input, SAMPLE).unwrap();

    let out = avcdsp(&["qpel", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("--width and --height"));
    assert!(!output.exists());

    let _ = std::fs::remove_file(input);
}

#[test]
fn forward_rejects_unaligned_planes() {
    let input = temp_path("odd.yuv");
    let output = temp_path("odd.coef");
    std::fs::write(&input, [0u8; 30]).unwrap();

    let out = avcdsp(&[
        "forward",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--width",
        "6",
        "--height",
        "5",
    ]);
    assert!(!out.status.success());

    let _ = std::fs::remove_file(input);
}

#[test]
fn gbim_reports_every_frame_on_stdout() {
    let input = temp_path("bright.yuv");
    let mut frames: Vec<u8> = (0..64).map(|i| (200 + ((i / 8) * 5 + (i % 8) * 11) % 37) as u8).collect();
    frames.extend(vec![90u8; 64]);
    std::fs::write(&input, &frames).unwrap();

    let out = avcdsp(&[
        "gbim",
        "-i",
        input.to_str().unwrap(),
        "--width",
        "8",
        "--height",
        "8",
        "--block-size",
        "4",
    ]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let report = String::from_utf8(out.stdout).unwrap();
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines[0], "frame\thorizontal\tvertical\tgbim");
    assert_eq!(lines[1], "0\t1.041019\t1.438072\t1.239545");
    // A flat frame has no edges at all.
    assert_eq!(lines[2], "1\tNaN\tNaN\tNaN");

    let out = avcdsp(&[
        "gbim", "-i", input.to_str().unwrap(), "--width", "8", "--height", "8", "--block-size", "3",
    ]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("block size"));

    let _ = std::fs::remove_file(input);
}
