//! Wavefront MTL parser.

use std::collections::HashMap;

use crate::{
    error::{ParseError, ParseResult},
    lexer::{self, Line},
    material::MaterialRecord,
};

/// Materials keyed by their `newmtl` name.
pub type MaterialLibrary = HashMap<String, MaterialRecord>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Directive {
    NewMaterial,
    Shininess,
    Ambient,
    Diffuse,
    Specular,
    Emissive,
    DiffuseMap,
    SpecularMap,
    NormalMap,
    OpticalDensity,
    Opacity,
    Illumination,
    Unknown,
}

impl Directive {
    fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "newmtl" => Self::NewMaterial,
            "Ns" => Self::Shininess,
            "Ka" => Self::Ambient,
            "Kd" => Self::Diffuse,
            "Ks" => Self::Specular,
            "Ke" => Self::Emissive,
            "map_Kd" => Self::DiffuseMap,
            "map_Ns" => Self::SpecularMap,
            "map_Bump" | "map_bump" | "bump" => Self::NormalMap,
            "Ni" => Self::OpticalDensity,
            "d" => Self::Opacity,
            "illum" => Self::Illumination,
            _ => Self::Unknown,
        }
    }
}

/// Parse MTL text into a material library.
///
/// Property lines before the first `newmtl` are an error. A repeated
/// `newmtl` name replaces the earlier record.
pub fn parse_mtl(text: &str) -> ParseResult<MaterialLibrary> {
    let mut materials = MaterialLibrary::new();
    let mut current: Option<(String, MaterialRecord)> = None;

    for line in lexer::lines(text) {
        let directive = Directive::from_keyword(line.keyword);
        match directive {
            Directive::Unknown => {
                log::warn!(
                    "Unhandled MTL keyword '{}' on line {}",
                    line.keyword,
                    line.number
                );
            }
            Directive::NewMaterial => {
                if let Some((name, record)) = current.take() {
                    insert(&mut materials, name, record);
                }
                current = Some((line.unparsed_args.to_owned(), MaterialRecord::default()));
            }
            _ => {
                let Some((_, record)) = current.as_mut() else {
                    return Err(ParseError::NoActiveMaterial {
                        line: line.number,
                        keyword: line.keyword.to_owned(),
                    });
                };
                apply(record, directive, &line)?;
            }
        }
    }

    if let Some((name, record)) = current {
        insert(&mut materials, name, record);
    }

    log::debug!("Parsed MTL: {} materials", materials.len());
    Ok(materials)
}

fn insert(materials: &mut MaterialLibrary, name: String, record: MaterialRecord) {
    if materials.insert(name.clone(), record).is_some() {
        log::debug!("Material '{}' redefined; keeping the later definition", name);
    }
}

fn apply(record: &mut MaterialRecord, directive: Directive, line: &Line<'_>) -> ParseResult<()> {
    match directive {
        Directive::Shininess => record.shininess = Some(line.f32_at(0, "shininess")?),
        Directive::Ambient => record.ambient = Some(parse_color(line, "ambient color")?),
        Directive::Diffuse => record.diffuse = Some(parse_color(line, "diffuse color")?),
        Directive::Specular => record.specular = Some(parse_color(line, "specular color")?),
        Directive::Emissive => record.emissive = Some(parse_color(line, "emissive color")?),
        // Map option flags (`-s`, `-bm`, ...) are kept as part of the filename.
        Directive::DiffuseMap => record.diffuse_map = Some(line.unparsed_args.to_owned()),
        Directive::SpecularMap => record.specular_map = Some(line.unparsed_args.to_owned()),
        Directive::NormalMap => record.normal_map = Some(line.unparsed_args.to_owned()),
        Directive::OpticalDensity => {
            record.optical_density = Some(line.f32_at(0, "optical density")?)
        }
        Directive::Opacity => record.opacity = Some(line.f32_at(0, "opacity")?),
        Directive::Illumination => record.illum = Some(parse_illum(line)?),
        Directive::NewMaterial | Directive::Unknown => {}
    }
    Ok(())
}

/// `r g b`, or a single value replicated to grey.
fn parse_color(line: &Line<'_>, field: &'static str) -> ParseResult<[f32; 3]> {
    match line.f32_all(field)?.as_slice() {
        &[v] => Ok([v, v, v]),
        &[r, g, b, ..] => Ok([r, g, b]),
        _ => Err(ParseError::MissingField {
            line: line.number,
            field,
        }),
    }
}

fn parse_illum(line: &Line<'_>) -> ParseResult<u32> {
    let token = line.parts().next().ok_or(ParseError::MissingField {
        line: line.number,
        field: "illumination model",
    })?;
    token.parse::<u32>().map_err(|_| ParseError::InvalidNumber {
        line: line.number,
        field: "illumination model",
        value: token.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diffuse_and_opacity_only() {
        let lib = parse_mtl("newmtl red\nKd 1 0 0\nd 0.5\n").unwrap();
        assert_eq!(lib.len(), 1);
        assert_eq!(
            lib["red"],
            MaterialRecord {
                diffuse: Some([1.0, 0.0, 0.0]),
                opacity: Some(0.5),
                ..Default::default()
            }
        );
    }

    #[test]
    fn full_material() {
        let src = "\
# Blender MTL File
newmtl Body Paint
Ns 225.000000
Ka 1.000000 1.000000 1.000000
Kd 0.800000 0.100000 0.100000
Ks 0.500000 0.500000 0.500000
Ke 0.0 0.0 0.0
Ni 1.450000
d 1.000000
illum 2
map_Kd textures/car body.png
map_Ns -s 1 1 1 spec.png
map_Bump normal.png
";
        let lib = parse_mtl(src).unwrap();
        let m = &lib["Body Paint"];
        assert_eq!(m.shininess, Some(225.0));
        assert_eq!(m.ambient, Some([1.0, 1.0, 1.0]));
        assert_eq!(m.diffuse, Some([0.8, 0.1, 0.1]));
        assert_eq!(m.specular, Some([0.5, 0.5, 0.5]));
        assert_eq!(m.emissive, Some([0.0, 0.0, 0.0]));
        assert_eq!(m.optical_density, Some(1.45));
        assert_eq!(m.opacity, Some(1.0));
        assert_eq!(m.illum, Some(2));
        assert_eq!(m.diffuse_map.as_deref(), Some("textures/car body.png"));
        assert_eq!(m.specular_map.as_deref(), Some("-s 1 1 1 spec.png"));
        assert_eq!(m.normal_map.as_deref(), Some("normal.png"));
    }

    #[test]
    fn several_materials_and_redefinition() {
        let src = "newmtl a\nNs 10\nnewmtl b\nNs 20\nnewmtl a\nNs 30\n";
        let lib = parse_mtl(src).unwrap();
        assert_eq!(lib.len(), 2);
        assert_eq!(lib["a"].shininess, Some(30.0));
        assert_eq!(lib["b"].shininess, Some(20.0));
    }

    #[test]
    fn single_component_color_is_grey() {
        let lib = parse_mtl("newmtl g\nKa 0.25\n").unwrap();
        assert_eq!(lib["g"].ambient, Some([0.25, 0.25, 0.25]));
    }

    #[test]
    fn property_before_newmtl_fails() {
        let err = parse_mtl("# comment\nKd 1 1 1\nnewmtl x\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::NoActiveMaterial {
                line: 2,
                keyword: "Kd".into(),
            }
        );
    }

    #[test]
    fn unknown_keywords_are_skipped() {
        let lib = parse_mtl("Tf 1 1 1\nnewmtl m\nTf 1 1 1\nKd 0 1 0\n").unwrap();
        assert_eq!(
            lib["m"],
            MaterialRecord {
                diffuse: Some([0.0, 1.0, 0.0]),
                ..Default::default()
            }
        );
    }

    #[test]
    fn bad_numbers_are_reported() {
        assert!(matches!(
            parse_mtl("newmtl m\nd half\n"),
            Err(ParseError::InvalidNumber { line: 2, field: "opacity", .. })
        ));
        assert!(matches!(
            parse_mtl("newmtl m\nillum 2.5\n"),
            Err(ParseError::InvalidNumber { line: 2, .. })
        ));
        assert!(matches!(
            parse_mtl("newmtl m\nKs 1 1\n"),
            Err(ParseError::MissingField { line: 2, .. })
        ));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(
            parse_mtl("newmtl m\nNs inf\n").unwrap_err(),
            ParseError::InvalidNumber {
                line: 2,
                field: "shininess",
                value: "inf".into(),
            }
        );
        assert!(matches!(
            parse_mtl("newmtl m\nKd 1 nan 0\n"),
            Err(ParseError::InvalidNumber { line: 2, field: "diffuse color", .. })
        ));
    }

    #[test]
    fn parsing_is_deterministic() {
        let src = "newmtl a\nKd 1 1 1\nnewmtl b\nmap_Kd b.png\n";
        assert_eq!(parse_mtl(src).unwrap(), parse_mtl(src).unwrap());
    }
}
