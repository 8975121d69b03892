//! Parsing a long model reply into test cases.

#![allow(missing_docs)]

use std::fmt::Write as _;

use criterion::{Criterion, criterion_group, criterion_main};
use reqgen::{RequirementId, parse::parse_test_cases};

/// A reply with a header, a separator, some prose and `rows` data rows.
fn reply(rows: usize) -> String {
    let mut raw = String::from(
        "Here are the test cases you asked for:\n\n\
         | Test Case ID | Requirement ID | Test Description | Preconditions | Test Steps | Expected Result | Priority |\n\
         |---|---|---|---|---|---|---|\n",
    );
    for i in 1..=rows {
        let _ = writeln!(
            raw,
            "| TC-{i} | TR-1 | Check behaviour {i} | User is logged in | 1. Open page 2. Click save | Changes are saved | High |"
        );
    }
    raw.push_str("\nLet me know if you need more cases.\n");
    raw
}

fn parse_reply(c: &mut Criterion) {
    let id: RequirementId = "TR-1".parse().unwrap();
    let raw = reply(500);

    c.bench_function("parse 500-row reply", |b| {
        b.iter(|| parse_test_cases(std::hint::black_box(&raw), &id));
    });
}

criterion_group!(benches, parse_reply);
criterion_main!(benches);
