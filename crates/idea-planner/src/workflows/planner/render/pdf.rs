use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::layout::{DocumentLayout, DrawOp, Rgb, PAGE_HEIGHT, PAGE_WIDTH};
use super::metrics::{win_ansi_byte, FontFace, POINTS_PER_MM};
use super::RenderError;

const PDF_VERSION: &str = "1.5";

/// Encode a laid-out document as PDF bytes.
///
/// No timestamps or random identifiers are written, so identical layouts
/// always produce identical bytes.
pub fn encode(layout: &DocumentLayout) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let mut fonts = Dictionary::new();
    for face in [FontFace::Regular, FontFace::Bold] {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => face.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(face.resource_name(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => fonts,
    });

    let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
    for page in &layout.pages {
        let mut operations = Vec::new();
        let mut annotations: Vec<Object> = Vec::new();
        for op in page.body.iter().chain(page.footer.iter()) {
            emit(op, &mut operations, &mut annotations, &mut doc);
        }

        let content = Content { operations }
            .encode()
            .map_err(|err| RenderError::Encode(err.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));

        let mut page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if !annotations.is_empty() {
            page_dict.set("Annots", annotations);
        }
        kids.push(doc.add_object(page_dict).into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                pt(PAGE_WIDTH).into(),
                pt(PAGE_HEIGHT).into(),
            ],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|err| RenderError::Encode(err.to_string()))?;
    Ok(bytes)
}

fn emit(
    op: &DrawOp,
    operations: &mut Vec<Operation>,
    annotations: &mut Vec<Object>,
    doc: &mut Document,
) {
    match op {
        DrawOp::Text {
            x,
            y,
            text,
            face,
            size,
            color,
        } => {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Tf",
                vec![face.resource_name().into(), (*size).into()],
            ));
            operations.push(Operation::new("rg", rgb_operands(*color)));
            operations.push(Operation::new("Td", vec![pt(*x).into(), flip(*y).into()]));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(win_ansi(text), StringFormat::Literal)],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        DrawOp::Rect {
            x,
            y,
            width,
            height,
            fill,
        } => {
            operations.push(Operation::new("rg", rgb_operands(*fill)));
            operations.push(Operation::new(
                "re",
                vec![
                    pt(*x).into(),
                    flip(y + height).into(),
                    pt(*width).into(),
                    pt(*height).into(),
                ],
            ));
            operations.push(Operation::new("f", vec![]));
        }
        DrawOp::Rule {
            x1,
            x2,
            y,
            thickness,
            color,
        } => {
            operations.push(Operation::new("RG", rgb_operands(*color)));
            operations.push(Operation::new("w", vec![pt(*thickness).into()]));
            operations.push(Operation::new("m", vec![pt(*x1).into(), flip(*y).into()]));
            operations.push(Operation::new("l", vec![pt(*x2).into(), flip(*y).into()]));
            operations.push(Operation::new("S", vec![]));
        }
        DrawOp::Link {
            x,
            y,
            width,
            height,
            url,
        } => {
            let annotation: ObjectId = doc.add_object(dictionary! {
                "Type" => "Annot",
                "Subtype" => "Link",
                "Rect" => vec![
                    pt(*x).into(),
                    flip(y + height).into(),
                    pt(x + width).into(),
                    flip(*y).into(),
                ],
                "Border" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
                "A" => dictionary! {
                    "S" => "URI",
                    "URI" => Object::string_literal(url.as_str()),
                },
            });
            annotations.push(annotation.into());
        }
    }
}

fn pt(mm: f32) -> f32 {
    round2(mm * POINTS_PER_MM)
}

fn flip(y_mm: f32) -> f32 {
    round2((PAGE_HEIGHT - y_mm) * POINTS_PER_MM)
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn rgb_operands(color: Rgb) -> Vec<Object> {
    let Rgb(r, g, b) = color;
    [r, g, b]
        .into_iter()
        .map(|channel| round2(f32::from(channel) / 255.0).into())
        .collect()
}

/// Maps text onto the WinAnsi code page; unmappable characters become `?`.
pub(crate) fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

#[cfg(test)]
mod tests {
    use super::win_ansi;

    #[test]
    fn maps_typographic_punctuation_to_win_ansi() {
        assert_eq!(win_ansi("It\u{2019}s \u{2013} 5\u{00B0}"), b"It\x92s \x96 5\xB0".to_vec());
    }

    #[test]
    fn replaces_unmappable_characters() {
        assert_eq!(win_ansi("\u{2713} ok"), b"? ok".to_vec());
    }
}
