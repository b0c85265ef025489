use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pretty_table_pager::pagination::PaginationMode;
use pretty_table_pager::parser::{parse_psql, record_columns};
use pretty_table_pager::streaming::StreamingLoader;
use pretty_table_pager::table::PaginatedTable;

/// psql aligned output for a `users`-like table: id, name, email, role.
fn psql_users(num_rows: usize) -> String {
    let mut out = String::from(" id | name | email | role\n----+------+-------+------\n");
    for id in 1..=num_rows {
        let role = if id % 7 == 0 { "admin" } else { "member" };
        out.push_str(&format!(
            " {} | user {} | user{}@example.com | {}\n",
            id, id, id, role
        ));
    }
    out.push_str(&format!("({} rows)\n", num_rows));
    out
}

/// Benchmark the streaming loader end to end: header scan, worker thread,
/// and draining every batch until the loader reports completion.
fn bench_streaming_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming_load");
    group.sample_size(20);

    for num_rows in [1_000, 10_000, 100_000] {
        let input = psql_users(num_rows);

        group.bench_with_input(BenchmarkId::new("rows", num_rows), &input, |b, input| {
            b.iter(|| {
                let mut loader = StreamingLoader::from_reader(Cursor::new(input.clone()))
                    .expect("read")
                    .expect("psql header");
                let mut loaded = 0;
                loop {
                    let complete = loader.is_complete();
                    loaded += loader.try_recv_batch(usize::MAX).len();
                    if complete {
                        break;
                    }
                    std::thread::yield_now();
                }
                loader.join().expect("clean input");
                black_box(loaded)
            });
        });
    }

    group.finish();
}

/// Benchmark time to first page for piped input read in one go:
/// parse, build positional columns, render page 1 at each selector size.
fn bench_first_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("first_page");
    let input = psql_users(10_000);

    for page_size in [5, 25, 100] {
        group.bench_with_input(
            BenchmarkId::new("page_size", page_size),
            &page_size,
            |b, &page_size| {
                b.iter(|| {
                    let data = parse_psql(black_box(&input)).expect("psql table");
                    let table = PaginatedTable::new(record_columns(&data.headers).expect("columns"));
                    let view = table.view(&data.rows, &PaginationMode::client(page_size), false);
                    black_box(view)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_streaming_load, bench_first_page);
criterion_main!(benches);
