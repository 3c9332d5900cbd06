use super::*;

pub(super) fn configure_connection(connection: &Connection) -> Result<()> {
    connection
        .pragma_update(None, "journal_mode", "WAL")
        .context("failed to set journal_mode=WAL")?;
    connection
        .pragma_update(None, "synchronous", "NORMAL")
        .context("failed to set synchronous=NORMAL")?;
    Ok(())
}

pub(super) fn ensure_schema(connection: &Connection) -> Result<()> {
    connection
        .execute_batch(
            "
        CREATE TABLE IF NOT EXISTS sections (
          id TEXT PRIMARY KEY,
          title TEXT,
          start_page INTEGER,
          end_page INTEGER,
          text TEXT,
          overview TEXT,
          p14 TEXT,
          p15 TEXT,
          p17 TEXT,
          p18 TEXT
        );

        CREATE TABLE IF NOT EXISTS parts (
          section_id TEXT NOT NULL,
          part_no INTEGER NOT NULL,
          title TEXT,
          start_page INTEGER,
          end_page INTEGER,
          text TEXT,
          PRIMARY KEY(section_id, part_no)
        );

        CREATE TABLE IF NOT EXISTS subsections (
          section_id TEXT NOT NULL,
          part_no INTEGER NOT NULL,
          level3_code TEXT NOT NULL DEFAULT '',
          level2_code TEXT,
          level2_title TEXT,
          level3_title TEXT,
          title TEXT,
          start_page INTEGER,
          end_page INTEGER,
          text TEXT,
          PRIMARY KEY(section_id, part_no, level3_code)
        );

        CREATE TABLE IF NOT EXISTS chunks (
          id TEXT PRIMARY KEY,
          source_id TEXT NOT NULL,
          section_id TEXT,
          part_no INTEGER,
          level2_code TEXT,
          level3_code TEXT,
          level2_title TEXT,
          level3_title TEXT,
          title TEXT,
          start_page INTEGER,
          end_page INTEGER,
          text TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_chunks_source ON chunks(source_id);
        CREATE INDEX IF NOT EXISTS idx_chunks_section ON chunks(section_id);

        CREATE TABLE IF NOT EXISTS std_refs (
          id TEXT PRIMARY KEY,
          title TEXT
        );

        CREATE TABLE IF NOT EXISTS section_std_ref_relations (
          section_id TEXT NOT NULL,
          reference_id TEXT NOT NULL,
          PRIMARY KEY(section_id, reference_id)
        );

        CREATE TABLE IF NOT EXISTS definitions (
          id TEXT PRIMARY KEY,
          definition TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS section_definition_relations (
          section_id TEXT NOT NULL,
          definition_id TEXT NOT NULL,
          PRIMARY KEY(section_id, definition_id)
        );

        CREATE TABLE IF NOT EXISTS section_relations (
          section_id TEXT NOT NULL,
          related_section_id TEXT NOT NULL,
          PRIMARY KEY(section_id, related_section_id)
        );
        ",
        )
        .context("failed to create segmentation schema")?;

    Ok(())
}

pub(super) fn count_rows(connection: &Connection, sql: &str) -> Result<i64> {
    let count = connection.query_row(sql, [], |row| row.get(0))?;
    Ok(count)
}

/// Upserts every record of one run inside a single transaction; rows are keyed by their
/// natural ids so re-running the same document rewrites rows instead of adding them.
pub(super) fn upsert_structure(
    connection: &mut Connection,
    structure: &DocumentStructure,
) -> Result<usize> {
    let tx = connection.transaction()?;

    {
        let mut section_statement = tx.prepare(
            "
            INSERT INTO sections(id, title, start_page, end_page, text, overview, p14, p15, p17, p18)
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
              title=excluded.title,
              start_page=excluded.start_page,
              end_page=excluded.end_page,
              text=excluded.text,
              overview=excluded.overview,
              p14=excluded.p14,
              p15=excluded.p15,
              p17=excluded.p17,
              p18=excluded.p18
            ",
        )?;
        for enriched in &structure.sections {
            let section = &enriched.section;
            section_statement.execute(params![
                section.id,
                section.title,
                section.start_page as i64,
                section.end_page as i64,
                section.text,
                enriched.overview,
                enriched.p14,
                enriched.p15,
                enriched.p17,
                enriched.p18
            ])?;
        }

        let mut part_statement = tx.prepare(
            "
            INSERT INTO parts(section_id, part_no, title, start_page, end_page, text)
            VALUES(?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(section_id, part_no) DO UPDATE SET
              title=excluded.title,
              start_page=excluded.start_page,
              end_page=excluded.end_page,
              text=excluded.text
            ",
        )?;
        for part in &structure.parts {
            part_statement.execute(params![
                part.section_id,
                part.part_no,
                part.title,
                part.start_page as i64,
                part.end_page as i64,
                part.text
            ])?;
        }

        let mut subsection_statement = tx.prepare(
            "
            INSERT INTO subsections(
              section_id, part_no, level3_code, level2_code, level2_title, level3_title,
              title, start_page, end_page, text
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(section_id, part_no, level3_code) DO UPDATE SET
              level2_code=excluded.level2_code,
              level2_title=excluded.level2_title,
              level3_title=excluded.level3_title,
              title=excluded.title,
              start_page=excluded.start_page,
              end_page=excluded.end_page,
              text=excluded.text
            ",
        )?;
        for subsection in &structure.subsections {
            subsection_statement.execute(params![
                subsection.section_id,
                subsection.part_no,
                subsection.level3_code.as_deref().unwrap_or_default(),
                subsection.level2_code,
                subsection.level2_title,
                subsection.level3_title,
                subsection.title,
                subsection.start_page as i64,
                subsection.end_page as i64,
                subsection.text
            ])?;
        }

        let mut chunk_statement = tx.prepare(
            "
            INSERT INTO chunks(
              id, source_id, section_id, part_no, level2_code, level3_code,
              level2_title, level3_title, title, start_page, end_page, text
            )
            VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            ON CONFLICT(id) DO UPDATE SET
              source_id=excluded.source_id,
              section_id=excluded.section_id,
              part_no=excluded.part_no,
              level2_code=excluded.level2_code,
              level3_code=excluded.level3_code,
              level2_title=excluded.level2_title,
              level3_title=excluded.level3_title,
              title=excluded.title,
              start_page=excluded.start_page,
              end_page=excluded.end_page,
              text=excluded.text
            ",
        )?;
        for chunk in &structure.chunks {
            chunk_statement.execute(params![
                chunk.id,
                chunk.source_id,
                chunk.section_id,
                chunk.part_no,
                chunk.level2_code,
                chunk.level3_code,
                chunk.level2_title,
                chunk.level3_title,
                chunk.title,
                chunk.start_page as i64,
                chunk.end_page as i64,
                chunk.text
            ])?;
        }

        let mut std_ref_statement = tx.prepare(
            "
            INSERT INTO std_refs(id, title)
            VALUES(?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
              title=COALESCE(excluded.title, std_refs.title)
            ",
        )?;
        for std_ref in &structure.std_refs {
            std_ref_statement.execute(params![std_ref.id, std_ref.title])?;
        }

        let mut std_ref_relation_statement = tx.prepare(
            "INSERT OR IGNORE INTO section_std_ref_relations(section_id, reference_id) VALUES(?1, ?2)",
        )?;
        for relation in &structure.std_ref_relations {
            std_ref_relation_statement.execute(params![relation.section_id, relation.reference_id])?;
        }

        let mut definition_statement = tx.prepare(
            "
            INSERT INTO definitions(id, definition)
            VALUES(?1, ?2)
            ON CONFLICT(id) DO UPDATE SET
              definition=excluded.definition
            ",
        )?;
        for definition in &structure.definitions {
            definition_statement.execute(params![definition.id, definition.definition])?;
        }

        let mut definition_relation_statement = tx.prepare(
            "INSERT OR IGNORE INTO section_definition_relations(section_id, definition_id) VALUES(?1, ?2)",
        )?;
        for relation in &structure.definition_relations {
            definition_relation_statement
                .execute(params![relation.section_id, relation.definition_id])?;
        }

        let mut section_relation_statement = tx.prepare(
            "INSERT OR IGNORE INTO section_relations(section_id, related_section_id) VALUES(?1, ?2)",
        )?;
        for relation in &structure.section_relations {
            section_relation_statement
                .execute(params![relation.section_id, relation.related_section_id])?;
        }
    }

    tx.commit().context("failed to commit segmentation upsert")?;

    Ok(structure.chunks.len())
}
