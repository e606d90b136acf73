use std::fmt;

use crate::{
    error::{ConfigError, RotResult},
    quaternion::Quaternion,
    vector::Vector,
};


/// Parsing states. Component-taking flags remember which component is next.
#[derive(Clone, Copy)]
enum Parse {
    None,
    Axis(usize),
    Angle,
    Vector(usize),
    Digits,
}
impl Parse {
    fn flag(&self) -> &'static str {
        match self {
            Parse::None      => "",
            Parse::Axis(_)   => "-axis",
            Parse::Angle     => "-angle",
            Parse::Vector(_) => "-vec",
            Parse::Digits    => "-digits",
        }
    }
}


/// User defined settings of the command line demo.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub axis: Vector,
    /// Degrees.
    pub angle: f32,
    pub vector: Vector,
    pub digits: usize,
    pub canonical: bool,
}
impl Config {
    /// Create a new Config with the specified command line arguments.
    ///
    /// `-axis x y z`, `-angle deg`, `-vec x y z`, `-digits n`, `-canonical`.
    pub fn new(args: Vec<String>) -> RotResult<Config> {
        let mut parser = Parse::None;
        let mut cfg    = Config::default();

        for arg in args.into_iter() {
            let next = match arg.as_str() {
                "-axis"      => Some(Parse::Axis(0)),
                "-angle"     => Some(Parse::Angle),
                "-vec"       => Some(Parse::Vector(0)),
                "-digits"    => Some(Parse::Digits),
                "-canonical" => Some(Parse::None),
                _ => None,
            };
            if let Some(next) = next {
                if !matches!(parser, Parse::None) {
                    return Err(ConfigError::MissingValue(parser.flag().to_string()));
                }
                if arg == "-canonical" {
                    cfg.canonical = true;
                }
                parser = next;
                continue;
            }

            parser = match parser {
                Parse::None => {
                    return Err(ConfigError::UnknownArgument(arg));
                }
                Parse::Axis(i) => {
                    set_component(&mut cfg.axis, i, parse_f32(&parser, &arg)?);
                    if i < 2 { Parse::Axis(i + 1) } else { Parse::None }
                }
                Parse::Vector(i) => {
                    set_component(&mut cfg.vector, i, parse_f32(&parser, &arg)?);
                    if i < 2 { Parse::Vector(i + 1) } else { Parse::None }
                }
                Parse::Angle => {
                    cfg.angle = parse_f32(&parser, &arg)?;
                    Parse::None
                }
                Parse::Digits => {
                    cfg.digits = arg.parse::<usize>().map_err(|_| {
                        ConfigError::InvalidNumber(parser.flag().to_string(), arg.clone())
                    })?;
                    Parse::None
                }
            };
        }
        if !matches!(parser, Parse::None) {
            return Err(ConfigError::MissingValue(parser.flag().to_string()));
        }
        Ok(cfg)
    }

    /// The configured rotation as a unit quaternion.
    pub fn rotation(&self) -> Quaternion {
        Quaternion::from_axis_angle(self.axis, self.angle.to_radians())
            .normalized(self.canonical)
    }
}
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "
            \rAxis:      {:.*}
            \rAngle:     {:.*} deg
            \rVector:    {:.*}
            \rCanonical: {}",
            self.digits, self.axis,
            self.digits, self.angle,
            self.digits, self.vector,
            self.canonical,
        )
    }
}
impl Default for Config {
    fn default() -> Self {
        Self {
            axis: Vector::new(0.0, 0.0, 1.0),
            angle: 90.0,
            vector: Vector::new(1.0, 0.0, 0.0),
            digits: 2,
            canonical: false,
        }
    }
}

fn parse_f32(parser: &Parse, arg: &str) -> RotResult<f32> {
    arg.parse::<f32>().map_err(|_| {
        ConfigError::InvalidNumber(parser.flag().to_string(), arg.to_string())
    })
}

fn set_component(vec: &mut Vector, i: usize, value: f32) {
    match i {
        0 => vec.x = value,
        1 => vec.y = value,
        _ => vec.z = value,
    }
}


#[cfg(test)]
fn args(s: &str) -> Vec<String> {
    s.split_whitespace().map(String::from).collect()
}

#[test]
fn defaults_without_arguments() {
    let cfg = Config::new(Vec::new()).unwrap();
    assert_eq!(cfg, Config::default());

    let rotated = cfg.rotation().rotate_vector(cfg.vector);
    approx::assert_abs_diff_eq!(rotated.x, 0.0, epsilon = 1e-6);
    approx::assert_abs_diff_eq!(rotated.y, 1.0, epsilon = 1e-6);
}

#[test]
fn parses_all_flags() {
    let cfg = Config::new(args("-axis 1 0 -1 -angle -45.5 -vec 0 2 3 -digits 4 -canonical")).unwrap();

    assert_eq!(cfg.axis, Vector::new(1.0, 0.0, -1.0));
    assert_eq!(cfg.angle, -45.5);
    assert_eq!(cfg.vector, Vector::new(0.0, 2.0, 3.0));
    assert_eq!(cfg.digits, 4);
    assert!(cfg.canonical);
    assert!(cfg.rotation().w >= 0.0);
}

#[test]
fn rejects_bad_arguments() {
    assert_eq!(
        Config::new(args("-spin 3")),
        Err(ConfigError::UnknownArgument("-spin".to_string()))
    );
    assert_eq!(
        Config::new(args("-axis 1 0")),
        Err(ConfigError::MissingValue("-axis".to_string()))
    );
    assert_eq!(
        Config::new(args("-vec 1 -angle 3")),
        Err(ConfigError::MissingValue("-vec".to_string()))
    );
    assert_eq!(
        Config::new(args("-angle ninety")),
        Err(ConfigError::InvalidNumber("-angle".to_string(), "ninety".to_string()))
    );
    assert_eq!(
        Config::new(args("-digits -1")),
        Err(ConfigError::InvalidNumber("-digits".to_string(), "-1".to_string()))
    );
    assert_eq!(
        Config::new(args("-angle 10 5")),
        Err(ConfigError::UnknownArgument("5".to_string()))
    );
}

#[test]
fn error_messages() {
    assert_eq!(
        ConfigError::InvalidNumber("-angle".to_string(), "x".to_string()).to_string(),
        "Invalid number 'x' for '-angle'"
    );
    assert_eq!(ConfigError::MissingValue("-vec".to_string()).to_string(), "Missing value for '-vec'");
}
