use std::fs;
use std::path::Path;

const PLACEHOLDER: &str = "<!DOCTYPE html>
<html>
  <head><meta charset=\"utf-8\"><title>Sales plans</title></head>
  <body><p>The editor has not been built. Run <code>trunk build --release</code> in <code>frontend/</code>.</p></body>
</html>
";

fn main() {
    let out_dir = Path::new("static");
    let dist_dir = Path::new("../frontend/dist");

    if dist_dir.exists() {
        let _ = fs::remove_dir_all(out_dir);
        fs::create_dir_all(out_dir).unwrap();
        fs_extra::dir::copy(
            dist_dir,
            out_dir,
            &fs_extra::dir::CopyOptions::new().overwrite(true).copy_inside(true),
        )
            .unwrap();
    } else if !out_dir.join("dist").join("index.html").exists() {
        fs::create_dir_all(out_dir.join("dist")).unwrap();
        fs::write(out_dir.join("dist").join("index.html"), PLACEHOLDER).unwrap();
    }
    println!("cargo:rerun-if-changed=../frontend/dist");
}
