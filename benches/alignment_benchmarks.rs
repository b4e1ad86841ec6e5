use criterion::{Criterion, black_box, criterion_group, criterion_main};

use postedit::document::AlignmentLink;
use postedit::translate::{char_to_word_index, derive_word_links, word_alignment_string};

/// A sentence of `count` four-letter words; word `i` starts at char `i * 5`.
fn make_sentence(count: usize) -> String {
    let words = ["word", "toks", "span", "char", "line"];
    let mut out = String::with_capacity(count * 5);
    for i in 0..count {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(words[i % words.len()]);
    }
    out
}

fn make_char_alignment(count: usize) -> String {
    let mut out = String::new();
    for i in 0..count {
        if i > 0 {
            out.push(' ');
        }
        let start = i * 5;
        out.push_str(&format!("{}:{}-{}:{}", start, start + 3, start, start + 3));
    }
    out
}

fn bench_char_map(c: &mut Criterion) {
    let sentence = make_sentence(2_000);

    c.bench_function("char_to_word_index (2K words)", |b| {
        b.iter(|| char_to_word_index(black_box(&sentence)))
    });
}

fn bench_derive_links(c: &mut Criterion) {
    let source = make_sentence(500);
    let target = make_sentence(500);
    let char_alignment = make_char_alignment(500);

    c.bench_function("derive_word_links (500 spans)", |b| {
        b.iter(|| {
            derive_word_links(
                black_box(&source),
                black_box(&target),
                black_box(&char_alignment),
            )
            .unwrap()
        })
    });
}

fn bench_alignment_string(c: &mut Criterion) {
    let links: Vec<AlignmentLink> = (0..500).map(|i| AlignmentLink::new(i, i)).collect();

    c.bench_function("word_alignment_string (500 links)", |b| {
        b.iter(|| word_alignment_string(black_box(&links)))
    });
}

criterion_group!(benches, bench_char_map, bench_derive_links, bench_alignment_string);
criterion_main!(benches);
