//! Benchmarks for block highlighting
//!
//! Run with: cargo bench --bench highlight

use syntaxkit::config::SearchPath;
use syntaxkit::syntax::{BlockFormat, Document, Highlighter, SyntaxRegistry};

fn main() {
    divan::main();
}

const C_SAMPLE: &str = r#"
#include <stdio.h>
#include <stdlib.h>

/* A tiny growable buffer */
typedef struct {
    char *data;
    size_t len;
    size_t cap;
} buffer_t;

static int buffer_push(buffer_t *buf, char c) {
    if (buf->len == buf->cap) {
        size_t cap = buf->cap ? buf->cap * 2 : 16;
        char *data = realloc(buf->data, cap);
        if (data == NULL) {
            return -1; // out of memory
        }
        buf->data = data;
        buf->cap = cap;
    }
    buf->data[buf->len++] = c;
    return 0;
}

int main(void) {
    buffer_t buf = {0};
    for (int i = 0; i < 0x40; i++) {
        buffer_push(&buf, 'a' + (i % 26));
    }
    printf("%zu bytes: \"%.*s\"\n", buf.len, (int)buf.len, buf.data);
    free(buf.data);
    return 0;
}
"#;

fn c_highlighter() -> Highlighter {
    SyntaxRegistry::new(SearchPath::bundled_only())
        .create_highlighter("c")
        .unwrap_or_default()
}

fn generate_large_c(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("int value_{i} = compute({i}, \"label {i}\"); // line {i}\n"))
        .collect()
}

#[divan::bench]
fn registry_first_lookup() {
    let registry = SyntaxRegistry::new(SearchPath::bundled_only());
    divan::black_box(registry.create_highlighter("cpp"));
}

#[divan::bench]
fn spans_sample(bencher: divan::Bencher) {
    let highlighter = c_highlighter();
    bencher.bench_local(|| {
        for line in C_SAMPLE.lines() {
            divan::black_box(highlighter.spans(line));
        }
    });
}

#[divan::bench]
fn highlight_block_sample(bencher: divan::Bencher) {
    let highlighter = c_highlighter();
    let mut format = BlockFormat::default();
    bencher.bench_local(|| {
        for line in C_SAMPLE.lines() {
            highlighter.highlight_block(line, &mut format);
            divan::black_box(format.runs());
        }
    });
}

#[divan::bench(args = [100, 1000, 5000])]
fn document_full_pass(bencher: divan::Bencher, lines: usize) {
    let text = generate_large_c(lines);
    let highlighter = c_highlighter();
    bencher.bench_local(|| {
        let mut doc = Document::new(&text);
        doc.bind_highlighter(highlighter.clone());
        for idx in 0..doc.line_count() {
            divan::black_box(doc.block_format(idx));
        }
    });
}
