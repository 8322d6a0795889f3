//! Performance benchmarks for interception and status reads

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use llmlink::intercept::{ErrorFallbackRegistry, ErrorInterceptor};
use llmlink::{ClientError, ErrorKind};

fn interceptor_benchmark(c: &mut Criterion) {
    let registry = ErrorFallbackRegistry::new().with_fallback(ErrorKind::Backend, || Ok(()));
    let interceptor = ErrorInterceptor::new(registry);

    let mut group = c.benchmark_group("interceptor");
    group.throughput(Throughput::Elements(1));

    group.bench_function("wrap_sync_success", |b| {
        b.iter(|| {
            let result = interceptor.wrap_sync("bench", || Ok(black_box(42u64)));
            black_box(result)
        })
    });

    group.bench_function("wrap_sync_fallback", |b| {
        b.iter(|| {
            let result: Result<Option<u64>, ClientError> =
                interceptor.wrap_sync("bench", || Err(ClientError::backend("bench")));
            black_box(result)
        })
    });

    group.finish();
}

fn manager_benchmark(c: &mut Criterion) {
    use llmlink::backend::{MockBackend, Provider};
    use llmlink::config::PollingConfig;
    use llmlink::connection::ConnectionManager;

    let manager = ConnectionManager::new(MockBackend::new(Provider::OpenAi), PollingConfig::default());

    let mut group = c.benchmark_group("connection_manager");

    group.bench_function("status", |b| {
        b.iter(|| black_box(manager.status()))
    });

    group.bench_function("metrics_snapshot", |b| {
        b.iter(|| black_box(manager.metrics()))
    });

    group.finish();
}

criterion_group!(benches, interceptor_benchmark, manager_benchmark);
criterion_main!(benches);
