use std::env;
use std::process;

use rotmath::config::Config;
use rotmath::Mat3x3;

fn main() {
    env_logger::init();

    let cfg = match Config::new(env::args().skip(1).collect()) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("usage: rotmath [-axis x y z] [-angle deg] [-vec x y z] [-digits n] [-canonical]");
            process::exit(1);
        }
    };
    log::info!("{cfg}");

    let digits = cfg.digits;
    let rotation = cfg.rotation();
    if !rotation.valid {
        log::warn!("rotation is not a number, results are undefined");
    }

    let rotated = rotation.rotate_vector(cfg.vector);
    let (axis, angle) = rotation.axis_angle();
    let mat = Mat3x3::from(rotation);

    println!("quaternion: {:.*}", digits, rotation);
    println!("axis:       {:.*}", digits, axis);
    println!("angle:      {:.*} deg", digits, angle.to_degrees());
    println!("rotated:    {:.*}", digits, rotated);
    println!("length:     {:.*} -> {:.*}", digits, cfg.vector.len(), digits, rotated.len());
    for (i, col) in [mat.c0, mat.c1, mat.c2].iter().enumerate() {
        println!("column {i}:   {:.*}", digits, col);
    }
}
