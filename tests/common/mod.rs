//! Synthetic PDF builder shared by the integration tests.

#![allow(dead_code)]

use lopdf::{dictionary, Document, Object, Stream};

/// Build a PDF whose pages hold the given content streams.
///
/// Pages are 600x800 points. `/F1` is Helvetica-Bold and `/F2` is Helvetica.
pub fn build_pdf(pages: &[String], title: Option<&str>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font = |doc: &mut Document, base: &str| {
        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => base,
            "Encoding" => "WinAnsiEncoding",
        })
    };
    let bold_id = font(&mut doc, "Helvetica-Bold");
    let regular_id = font(&mut doc, "Helvetica");
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => bold_id, "F2" => regular_id },
    });

    let mut kids = Vec::new();
    for content in pages {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.as_bytes().to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(Object::Reference(page_id));
    }
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages.len() as i64,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(600),
                Object::Integer(800),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    if let Some(title) = title {
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(title),
        });
        doc.trailer.set("Info", info_id);
    }

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// One text object: font resource, size, baseline origin, literal text.
pub fn text(font: &str, size: u32, x: u32, y: u32, body: &str) -> String {
    format!("BT /{} {} Tf {} {} Td ({}) Tj ET\n", font, size, x, y, body)
}

/// A two-page field guide with a boxed sponsor notice on page 2.
pub fn field_guide() -> Vec<String> {
    let page1 = [
        text("F1", 24, 72, 720, "Field Guide to Valley Birds"),
        text("F1", 18, 72, 650, "Introduction"),
        text("F2", 11, 72, 620, "Robins sing at dawn"),
        text("F2", 11, 72, 600, "Wrens nest in hedges"),
        text("F2", 11, 72, 580, "Owls hunt at night"),
    ]
    .concat();
    let page2 = [
        text("F1", 18, 72, 720, "Habitats"),
        text("F1", 14, 72, 680, "Wetland edges"),
        text("F2", 11, 72, 650, "Herons wade in shallows"),
        text("F2", 11, 72, 630, "Reeds hide the bitterns"),
        text("F2", 11, 72, 610, "Ducks dabble near shore"),
        "0 0 1 RG 300 200 200 100 re S\n".to_string(),
        text("F1", 18, 320, 250, "Sponsored Content Notice"),
        text("F2", 11, 72, 60, "Page 2"),
    ]
    .concat();
    vec![page1, page2]
}
