use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Fixed-point fraction bits used by the YUV decoder.
const SHIFT: u32 = 16;

/// BT.601 chroma coefficients (full-range luma, chroma centered at 128).
const R_FROM_V: f64 = 1.370705;
const G_FROM_V: f64 = 0.698001;
const G_FROM_U: f64 = 0.337633;
const B_FROM_U: f64 = 1.732446;

fn write_table(file: &mut File, name: &str, doc: &str, coefficient: f64) {
    writeln!(file, "/// {doc}").unwrap();
    writeln!(file, "/// Index: raw chroma byte, Value: coefficient * (byte - 128) in 16.16 fixed point").unwrap();
    writeln!(file, "pub static {name}: [i32; 256] = [").unwrap();
    for i in 0..256 {
        let centered = i as f64 - 128.0;
        let value = (coefficient * centered * (1u32 << SHIFT) as f64).round() as i32;
        if i > 0 && i % 8 == 0 {
            writeln!(file).unwrap();
        }
        write!(file, "    {value},").unwrap();
    }
    writeln!(file, "\n];\n").unwrap();
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("yuv_lut.rs");
    let mut file = File::create(&dest_path).unwrap();

    writeln!(file, "/// Fraction bits of the chroma tables").unwrap();
    writeln!(file, "pub const SHIFT: u32 = {SHIFT};\n").unwrap();

    write_table(&mut file, "R_V", "Red contribution of V", R_FROM_V);
    write_table(&mut file, "G_V", "Green contribution of V (subtracted)", G_FROM_V);
    write_table(&mut file, "G_U", "Green contribution of U (subtracted)", G_FROM_U);
    write_table(&mut file, "B_U", "Blue contribution of U", B_FROM_U);

    // Rerun if build.rs changes
    println!("cargo::rerun-if-changed=build.rs");
}
