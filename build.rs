use std::env;
use std::fs;
use std::path::Path;

// Solo se reenvían al compilador las claves de la grilla
const KEY_PREFIX: &str = "HORARIOS_";

fn main() {
    // Cargar endpoints y tiempos desde .env si existe
    let env_file = Path::new(".env");

    if env_file.exists() {
        println!("cargo:rerun-if-changed=.env");

        if let Ok(contents) = fs::read_to_string(env_file) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                let Some((key, value)) = line.split_once('=') else {
                    continue;
                };
                let key = key.trim();
                let value = value.trim().trim_matches('"');

                if !key.starts_with(KEY_PREFIX) {
                    continue;
                }

                // Una variable del entorno real tiene prioridad sobre .env
                if env::var(key).is_err() {
                    println!("cargo:rustc-env={}={}", key, value);
                }
            }
        }
    }

    println!("cargo:rerun-if-changed=build.rs");
}
