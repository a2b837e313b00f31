use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use impulse_solver::{
    config::DEFAULT_TIME_STEP,
    BodySet, ConstraintSolver, MassProperties, Material, RigidBody, SolverUpdateable, Vec3, Wheel,
    WheelContact,
};
use std::hint::black_box;

const DT: f32 = DEFAULT_TIME_STEP;

fn prepare_vehicles(wheel_count: usize) -> (BodySet, Vec<Wheel>) {
    let mut bodies = BodySet::new();
    let ground = bodies.insert(RigidBody::new_static(Vec3::new(0.0, -1.0, 0.0)));
    let mut wheels = Vec::with_capacity(wheel_count);

    for i in 0..wheel_count {
        let position = Vec3::new(i as f32 * 2.0, 0.0, 0.0);
        let mut body = RigidBody::new(position, MassProperties::default());
        body.velocity.linear = Vec3::new(5.0 + i as f32 * 0.01, -9.81 * DT, 0.0);
        let vehicle = bodies.insert(body);

        let mut wheel = Wheel::new(vehicle);
        if i % 2 == 0 {
            wheel.brake_mut().set_braking(true);
        } else {
            wheel.driving_motor_mut().set_target_speed(10.0);
        }
        wheel.set_contact(Some(WheelContact {
            support: Some(ground),
            point: position + Vec3::new(0.3, -0.5, 0.2),
            normal: Vec3::Y,
            forward: Vec3::X,
            suspension_length: 0.45,
            material: Material::asphalt().interaction_with(&Material::rubber()),
        }));
        wheels.push(wheel);
    }
    (bodies, wheels)
}

fn bench_solver_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("solver_step");
    for &count in &[16usize, 128, 1024] {
        group.bench_with_input(BenchmarkId::new("wheels", count), &count, |b, &count| {
            let solver = ConstraintSolver::default();
            b.iter(|| {
                let (mut bodies, mut wheels) = prepare_vehicles(count);
                let mut items: Vec<&mut dyn SolverUpdateable> = wheels
                    .iter_mut()
                    .map(|wheel| wheel as &mut dyn SolverUpdateable)
                    .collect();
                let metrics = solver
                    .step(black_box(DT), &mut bodies, &mut items)
                    .expect("bench step");
                black_box(metrics);
            })
        });
    }
    group.finish();
}

fn bench_warm_started_steps(c: &mut Criterion) {
    c.bench_function("warm_started_steps_128", |b| {
        let solver = ConstraintSolver::default();
        let (mut bodies, mut wheels) = prepare_vehicles(128);
        b.iter(|| {
            let mut items: Vec<&mut dyn SolverUpdateable> = wheels
                .iter_mut()
                .map(|wheel| wheel as &mut dyn SolverUpdateable)
                .collect();
            black_box(solver.step(DT, &mut bodies, &mut items).expect("bench step"));
        })
    });
}

criterion_group!(benches, bench_solver_step, bench_warm_started_steps);
criterion_main!(benches);
