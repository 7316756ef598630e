#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// 一次扫描：射野尺寸 (mm) 与 (深度 mm, 读数) 数据点
pub struct Scan<'a> {
    pub inplane_mm: f64,
    pub crossplane_mm: f64,
    pub points: &'a [(f64, f64)],
}

pub fn mephisto_content(scans: &[Scan]) -> String {
    let mut s = String::from("BEGIN_SCAN_DATA\n\tFORMAT=MEPHISTO\n");
    s.push_str("\tFILE_CREATION_DATE=16-Oct-2026\n");
    for (i, scan) in scans.iter().enumerate() {
        let n = i + 1;
        s.push_str(&format!("\tBEGIN_SCAN  {}\n", n));
        s.push_str("\t\tTASK_NAME=PDD\n");
        s.push_str("\t\tSCAN_CURVETYPE=PDD\n");
        s.push_str(&format!("\t\tFIELD_INPLANE={:.2}\n", scan.inplane_mm));
        s.push_str(&format!("\t\tFIELD_CROSSPLANE={:.2}\n", scan.crossplane_mm));
        s.push_str("\t\tBEGIN_DATA\n");
        for (depth, reading) in scan.points {
            s.push_str(&format!("\t\t\t{:.2}\t\t{:.4E}\n", depth, reading));
        }
        s.push_str("\t\tEND_DATA\n");
        s.push_str(&format!("\tEND_SCAN  {}\n", n));
    }
    s.push_str("END_SCAN_DATA\n");
    s
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

/// 三个方野 5、10、20 cm，深度 10 cm 处归一化剂量分别为 50、60、70
pub fn three_field_pdd() -> String {
    mephisto_content(&[
        Scan {
            inplane_mm: 50.0,
            crossplane_mm: 50.0,
            points: &[(0.0, 0.8), (50.0, 1.0), (100.0, 0.5)],
        },
        Scan {
            inplane_mm: 100.0,
            crossplane_mm: 100.0,
            points: &[(0.0, 0.8), (50.0, 1.0), (100.0, 0.6)],
        },
        Scan {
            inplane_mm: 200.0,
            crossplane_mm: 200.0,
            points: &[(0.0, 0.8), (50.0, 1.0), (100.0, 0.7)],
        },
    ])
}

pub const CALIBRATION_CSV: &str = "\
field_area,Scp_open,Sc_open,Scp_wedge,Sc_wedge
25,0.98,0.99,0.97,
100,1.00,1.00,1.00,1.00
400,1.03,1.01,NaN,1.02
";
