use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use go125_codegen::*;
use std::hint::black_box as bb;

// =============================================================================
// Corpus
// =============================================================================

const SMALL_MAIN: &str = r#"
package main

func main() {
    println("Hello, World!")
}
"#;

const MEDIUM_GEOMETRY: &str = r#"
package geometry

import "math"

type Point struct {
    X, Y float64
}

func (p Point) Abs() float64 {
    return math.Sqrt(p.X*p.X + p.Y*p.Y)
}

func (p *Point) Scale(f float64) {
    p.X = p.X * f
    p.Y = p.Y * f
}

type Rectangle struct {
    Width, Height float64
}

func (r Rectangle) Area() float64 {
    return r.Width * r.Height
}
"#;

const LARGE_MODEL: &str = r#"
// Package store persists users.
package store

import (
    "context"
    "encoding/json"
    "fmt"
    "time"
)

type Kind int

const (
    KindUnknown Kind = iota
    KindUser
    KindAdmin
)

const (
    MaxUsers = 1024
    Ratio    = 0.75
    Prefix   = "user:"
)

var (
    defaultTTL = 5 * time.Minute
    registry   = map[string]Kind{}
)

type User struct {
    ID       int64             `json:"id"`
    Name     string            `json:"name"`
    Tags     []string          `json:"tags,omitempty"`
    Meta     map[string]string `json:"meta"`
    Created  time.Time         `json:"created"`
    Kind     Kind              `json:"kind"`
}

type Store interface {
    Get(ctx context.Context, id int64) (*User, error)
    Put(ctx context.Context, u *User) error
    Delete(ctx context.Context, ids ...int64) (int, error)
}

type Codec func(v any) ([]byte, error)

// Encode writes the user as JSON.
func (u *User) Encode() ([]byte, error) {
    return json.Marshal(u)
}

func (u User) String() string {
    return fmt.Sprintf("%d:%s", u.ID, u.Name)
}

func Lookup(name string) (Kind, bool) {
    k, ok := registry[name]
    return k, ok
}
"#;

const CORPORA: [(&str, &str); 3] = [
    ("small", SMALL_MAIN),
    ("medium", MEDIUM_GEOMETRY),
    ("large", LARGE_MODEL),
];

fn parse(src: &str) -> File {
    match SourceParser::new(&GoSyntax, &MarkerDecoder).parse("bench.go", src) {
        Ok(f) => f,
        Err(e) => panic!("corpus does not parse: {e}"),
    }
}

// =============================================================================
// Benchmark 1: Source -> model
// =============================================================================

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    let parser = SourceParser::new(&GoSyntax, &MarkerDecoder);

    for (name, src) in CORPORA {
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &src, |b, &src| {
            b.iter(|| bb(parser.parse("bench.go", bb(src))));
        });
    }

    group.finish();
}

// =============================================================================
// Benchmark 2: Model -> source
// =============================================================================

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let renderer = EntityRenderer::new(&GoSyntax);

    for (name, src) in CORPORA {
        let file = parse(src);
        group.throughput(Throughput::Bytes(src.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &file, |b, file| {
            b.iter(|| bb(renderer.render(bb(file))));
        });
    }

    group.finish();
}

// =============================================================================
// Benchmark 3: Model passes (validate, clone, rename)
// =============================================================================

fn bench_passes(c: &mut Criterion) {
    let mut group = c.benchmark_group("passes");
    let file = parse(LARGE_MODEL);
    let codec = JsonCodec::new();

    group.bench_function("validate_large", |b| {
        let validator = EntityValidator::new(&GoSyntax);
        b.iter(|| bb(validator.validate(bb(&file))));
    });

    group.bench_function("clone_large", |b| {
        let cloner = EntityCloner::new(&codec);
        b.iter(|| bb(cloner.clone(bb(&file))));
    });

    group.bench_function("rename_large", |b| {
        let renamer = EntityImportRenamer::new();
        b.iter_batched(
            || parse(LARGE_MODEL),
            |mut file| {
                bb(renamer.rename(&mut file, "json", "stdjson")).ok();
                bb(file);
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_render, bench_passes);
criterion_main!(benches);
