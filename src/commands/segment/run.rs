use super::*;

pub fn run(args: SegmentArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("run-{}", utc_compact_string(started_ts));

    let source_id = args
        .source_id
        .clone()
        .unwrap_or_else(|| default_source_id(&args.pages_file));
    let manifest_dir = args.cache_root.join("manifests");
    ensure_directory(&manifest_dir)?;

    let output_path = args.output_path.clone().unwrap_or_else(|| {
        args.cache_root
            .join("segments")
            .join(format!("{}.json", sanitize_for_file_name(&source_id)))
    });
    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        manifest_dir.join(format!(
            "segment_run_{}.json",
            utc_compact_string(started_ts)
        ))
    });

    info!(
        pages_file = %args.pages_file.display(),
        source_id = %source_id,
        run_id = %run_id,
        "starting segmentation"
    );

    let mut warnings = Vec::<String>::new();
    let pages = read_pages(&args.pages_file, args.max_pages)?;
    if pages.is_empty() {
        let message = format!("no page text found in {}", args.pages_file.display());
        warn!(path = %args.pages_file.display(), "no page text found");
        warnings.push(message);
    }
    if args.min_chars > args.max_chars {
        let message = format!(
            "min_chars {} exceeds max_chars {}; every sliced tail is merged into its predecessor",
            args.min_chars, args.max_chars
        );
        warn!(
            min_chars = args.min_chars,
            max_chars = args.max_chars,
            "min_chars exceeds max_chars"
        );
        warnings.push(message);
    }

    let options = ChunkOptions {
        source_id: source_id.clone(),
        max_chars: args.max_chars,
        min_chars: args.min_chars,
    };
    let segmenter = Segmenter::new()?;
    let structure = segmenter.segment(&pages, &options);

    write_json_pretty(&output_path, &structure)?;
    info!(path = %output_path.display(), "wrote document structure");

    let chunks_upserted = match &args.db_path {
        Some(db_path) => persist_structure(db_path, &structure)?,
        None => 0,
    };

    let manifest = SegmentRunManifest {
        manifest_version: 1,
        run_id: run_id.clone(),
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        source_id,
        source_sha256: sha256_file(&args.pages_file)?,
        max_chars: args.max_chars,
        min_chars: args.min_chars,
        paths: SegmentPaths {
            pages_file: args.pages_file.display().to_string(),
            output_path: output_path.display().to_string(),
            db_path: args.db_path.as_ref().map(|path| path.display().to_string()),
        },
        counts: structure_counts(&structure, chunks_upserted),
        warnings,
    };
    write_json_pretty(&manifest_path, &manifest)?;

    info!(
        path = %manifest_path.display(),
        run_id = %run_id,
        sections = manifest.counts.section_count,
        chunks = manifest.counts.chunk_count,
        "segmentation completed"
    );

    Ok(())
}

fn persist_structure(db_path: &Path, structure: &DocumentStructure) -> Result<usize> {
    if let Some(parent) = db_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        ensure_directory(parent)?;
    }

    let mut connection = Connection::open(db_path)
        .with_context(|| format!("failed to open {}", db_path.display()))?;
    configure_connection(&connection)?;
    ensure_schema(&connection)?;

    let chunks_upserted = upsert_structure(&mut connection, structure)?;
    let chunks_total = count_rows(&connection, "SELECT COUNT(*) FROM chunks")?;
    let sections_total = count_rows(&connection, "SELECT COUNT(*) FROM sections")?;
    info!(
        db_path = %db_path.display(),
        chunks_upserted,
        chunks_total,
        sections_total,
        "persisted document structure"
    );

    Ok(chunks_upserted)
}

fn structure_counts(structure: &DocumentStructure, chunks_upserted: usize) -> SegmentCounts {
    SegmentCounts {
        page_count: structure.page_count,
        section_count: structure.sections.len(),
        part_count: structure.parts.len(),
        subsection_count: structure.subsections.len(),
        chunk_count: structure.chunks.len(),
        std_ref_count: structure.std_refs.len(),
        definition_count: structure.definitions.len(),
        section_relation_count: structure.section_relations.len(),
        chunks_upserted,
    }
}
