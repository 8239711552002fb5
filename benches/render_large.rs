//! This bench measures parsing and rendering a large stored document with
//! every kind of mark.

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use regmaps::{
    Content, Document, Mark, Node, ReferenceAttrs,
    domain::{TooltipAttrs, document::BlockKind},
    render,
};

/// Builds a document of `sections` headed sections, each with a few marked
/// paragraphs and a list.
fn large_document(sections: usize) -> Document {
    let tooltip = Mark::Tooltip(TooltipAttrs::new("Aset Tertimbang Menurut Risiko").unwrap());
    let mut content = Vec::new();
    for i in 1..=sections {
        let reference = Mark::Reference(
            ReferenceAttrs::new(Some("POJK11"), Some("02"), Some(&i.to_string())).unwrap(),
        );
        content.push(Node::block(
            BlockKind::Heading(2),
            vec![Node::text(format!("Bagian {i}"))],
        ));
        for _ in 0..4 {
            content.push(Node::paragraph(vec![
                Node::text("Bank wajib menghitung "),
                Node::marked_text("ATMR", vec![Mark::Bold, tooltip.clone()]),
                Node::text(" sesuai "),
                Node::marked_text("Pasal 6", vec![reference.clone()]),
                Node::HardBreak,
                Node::marked_text("dengan pendekatan standar.", vec![Mark::Italic]),
            ]));
        }
        content.push(Node::block(
            BlockKind::BulletList,
            vec![Node::block(
                BlockKind::ListItem,
                vec![Node::paragraph(vec![Node::text("risiko kredit")])],
            )],
        ));
    }
    Document::new(content)
}

fn render_large(c: &mut Criterion) {
    let document = large_document(500);
    let stored = document.to_json_string();
    let content = Content::from(document);

    c.bench_function("parse large document", |b| {
        b.iter(|| Content::parse(std::hint::black_box(&stored)));
    });

    c.bench_function("render large document", |b| {
        b.iter(|| render::to_html(&render::render(std::hint::black_box(&content))));
    });
}

criterion_group!(benches, render_large);
criterion_main!(benches);
