use std::fmt;

use super::Tensor;

/// 打印张量：先输出形状，再输出（必要时四角截断的）二维数值表。
/// 非二维张量先按[1, size]展平显示。
impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "形状: {:?}", self.shape())?;

        let (rows, cols) = if self.dimension() == 2 {
            (self.shape()[0], self.shape()[1])
        } else {
            (1, self.size())
        };
        let flat = self.flatten_view();
        let at = |i: usize, j: usize| flat[i * cols + j];

        let row_indices = display_indices(rows);
        let col_indices = display_indices(cols);

        let mut prev_row = None;
        for &i in &row_indices {
            if let Some(prev) = prev_row {
                if i > prev + 1 {
                    writeln!(f, "    ..  ")?;
                }
            }
            let mut prev_col = None;
            for &j in &col_indices {
                if let Some(prev) = prev_col {
                    if j > prev + 1 {
                        write!(f, "   ..  ")?;
                    }
                }
                write!(f, "{:8.4} ", at(i, j))?;
                prev_col = Some(j);
            }
            writeln!(f)?;
            prev_row = Some(i);
        }
        Ok(())
    }
}

/// 超过6行/列时只显示头尾各3个。
fn display_indices(len: usize) -> Vec<usize> {
    if len > 6 {
        (0..3).chain(len - 3..len).collect()
    } else {
        (0..len).collect()
    }
}
