use anyhow::{Context as _, bail};

use flatbvh::{Heuristic, construct};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("usage: flatbvh-cli <mesh.obj> [median|middle|sah|sah-buckets]")?;
    let heuristic = match args.next().as_deref() {
        None | Some("sah-buckets") => Heuristic::SurfaceAreaHeuristicBuckets,
        Some("sah") => Heuristic::SurfaceAreaHeuristic,
        Some("median") => Heuristic::ObjectMedianSplit,
        Some("middle") => Heuristic::SpatialMiddleSplit,
        Some(other) => bail!("unknown heuristic {other:?}"),
    };

    let bvh = construct(&path, heuristic);
    bvh.print_statistics();

    Ok(())
}
