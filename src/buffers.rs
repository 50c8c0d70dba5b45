use ratatui::{buffer::Buffer, layout::Rect};

/// Copies the window of `src` starting at `src_offset` into `tgt_area` of `tgt`.
///
/// Cells falling outside either buffer are skipped.
pub fn blit(tgt: &mut Buffer, tgt_area: Rect, src: &Buffer, src_offset: (u16, u16)) {
    let (src_offset_x, src_offset_y) = src_offset;
    let src_area = src.area;

    for rel_y in 0..tgt_area.height {
        for rel_x in 0..tgt_area.width {
            let tgt_x = tgt_area.x + rel_x;
            let tgt_y = tgt_area.y + rel_y;

            let src_x = src_area.x.saturating_add(rel_x).saturating_add(src_offset_x);
            let src_y = src_area.y.saturating_add(rel_y).saturating_add(src_offset_y);

            copy_cel(tgt, src, tgt_x, tgt_y, src_x, src_y);
        }
    }
}

#[inline(always)]
fn copy_cel(tgt: &mut Buffer, src: &Buffer, tgt_x: u16, tgt_y: u16, src_x: u16, src_y: u16) {
    let Some(src_cell) = src.cell((src_x, src_y)) else {
        return;
    };
    let Some(tgt_cell) = tgt.cell_mut((tgt_x, tgt_y)) else {
        return;
    };
    tgt_cell.set_symbol(src_cell.symbol());
    tgt_cell.set_style(src_cell.style());
}
