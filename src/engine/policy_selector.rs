// ==========================================
// 备件补货计划系统 - 策略族选择器
// ==========================================
// 依据: Planning_Engine_Specs_v1.2_Integrated.md - 2. Policy Selector
// 红线: 全域全函数,无副作用;未覆盖组合一律保守取定期盘点
// ==========================================
// 职责: (需求模式, ABC-XYZ) → 策略族
// ==========================================

use crate::domain::types::{AbcClass, AbcXyzTag, DemandPattern, PolicyFamily, XyzClass};

// ==========================================
// PolicySelector - 策略族选择器
// ==========================================
pub struct PolicySelector {
    // 无状态引擎
}

impl PolicySelector {
    pub fn new() -> Self {
        Self {}
    }

    /// 策略族选择（纯函数,输入域穷举）
    ///
    /// 规则:
    /// - 平稳/波动（可预测）→ 连续盘点 (Q,R),紧跟再订货点
    /// - 间歇/块状（稀疏）→ 定期盘点 (s,S),按周期批量复核,抑制噪声触发
    /// - 低价值高波动 (C x Z) 即便需求频繁也取定期盘点
    pub fn select(&self, pattern: DemandPattern, tag: AbcXyzTag) -> PolicyFamily {
        match pattern {
            DemandPattern::Smooth | DemandPattern::Erratic => match tag.abc {
                AbcClass::A | AbcClass::B => PolicyFamily::ContinuousReview,
                AbcClass::C => match tag.xyz {
                    XyzClass::X | XyzClass::Y => PolicyFamily::ContinuousReview,
                    XyzClass::Z => PolicyFamily::PeriodicReview,
                },
            },
            DemandPattern::Intermittent | DemandPattern::Lumpy => PolicyFamily::PeriodicReview,
        }
    }
}

impl Default for PolicySelector {
    fn default() -> Self {
        Self::new()
    }
}

// ==========================================
// 单元测试: 输入域穷举
// ==========================================
#[cfg(test)]
mod tests {
    use super::*;

    fn all_tags() -> Vec<AbcXyzTag> {
        let mut tags = Vec::new();
        for abc in [AbcClass::A, AbcClass::B, AbcClass::C] {
            for xyz in [XyzClass::X, XyzClass::Y, XyzClass::Z] {
                tags.push(AbcXyzTag { abc, xyz });
            }
        }
        tags
    }

    #[test]
    fn test_sparse_patterns_always_periodic() {
        let selector = PolicySelector::new();
        for pattern in [DemandPattern::Intermittent, DemandPattern::Lumpy] {
            for tag in all_tags() {
                assert_eq!(selector.select(pattern, tag), PolicyFamily::PeriodicReview);
            }
        }
    }

    #[test]
    fn test_regular_high_value_continuous() {
        let selector = PolicySelector::new();
        for pattern in [DemandPattern::Smooth, DemandPattern::Erratic] {
            for abc in [AbcClass::A, AbcClass::B] {
                for xyz in [XyzClass::X, XyzClass::Y, XyzClass::Z] {
                    assert_eq!(
                        selector.select(pattern, AbcXyzTag { abc, xyz }),
                        PolicyFamily::ContinuousReview
                    );
                }
            }
        }
    }

    #[test]
    fn test_low_value_high_variability_falls_back_to_periodic() {
        let selector = PolicySelector::new();
        let tag = AbcXyzTag {
            abc: AbcClass::C,
            xyz: XyzClass::Z,
        };
        assert_eq!(
            selector.select(DemandPattern::Smooth, tag),
            PolicyFamily::PeriodicReview
        );
        assert_eq!(
            selector.select(DemandPattern::Erratic, tag),
            PolicyFamily::PeriodicReview
        );
    }

    #[test]
    fn test_total_over_input_domain() {
        // 穷举 4 模式 x 9 标签,任何组合都必须有确定结果
        let selector = PolicySelector::new();
        let mut count = 0;
        for pattern in [
            DemandPattern::Smooth,
            DemandPattern::Erratic,
            DemandPattern::Intermittent,
            DemandPattern::Lumpy,
        ] {
            for tag in all_tags() {
                let _ = selector.select(pattern, tag);
                count += 1;
            }
        }
        assert_eq!(count, 36);
    }
}
